//! Attribute scanning and unification, observed through rendered output.

use haml_compiler::haml::config::Backend;
use haml_compiler::haml::loader::TemplateLoader;
use haml_compiler::{Context, Engine, Template};
use rstest::rstest;
use serde_json::{json, Value};

fn render(backend: Backend, source: &str, context: Value) -> String {
    Template::compile(source).render_on(backend, Engine::new(), &Context::from(context))
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_simple_trailing_attributes(backend: Backend) {
    assert_eq!(
        render(backend, "%a href=\"/home\" title='Home' Go home", json!({})),
        "<a href=\"/home\" title=\"Home\">Go home</a>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_attribute_order(backend: Backend) {
    assert_eq!(
        render(backend, "%p.note#top{ lang: \"en\" } dir=\"ltr\"", json!({})),
        "<p class=\"note\" id=\"top\" lang=\"en\" dir=\"ltr\"></p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_nested_braces_and_backticks(backend: Backend) {
    assert_eq!(
        render(backend, "%p{ data: \"{a,b}\", id: \"x\" }", json!({})),
        "<p data=\"{a,b}\" id=\"x\"></p>"
    );
    assert_eq!(
        render(backend, "%p{ title: `a, }b`, id: \"x\" } text", json!({})),
        "<p title=\"`a, }b`\" id=\"x\">text</p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_expression_attribute_is_escaped_unless_raw(backend: Backend) {
    let context = json!({"url": "/x?a=1&b=2"});
    assert_eq!(
        render(backend, "%a href={{ url }}", context.clone()),
        "<a href=\"/x?a=1&amp;b=2\"></a>"
    );
    assert_eq!(
        render(backend, "%a{ href: {{ raw url }} }", context),
        "<a href=\"/x?a=1&b=2\"></a>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_mixed_value_concatenates(backend: Backend) {
    assert_eq!(
        render(backend, "%img{ src: \"/img/{{ id }}.png\", alt: \"{{ id }}\" }", json!({"id": 7})),
        "<img src=\"/img/7.png\" alt=\"7\"></img>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_class_merges_with_shorthand(backend: Backend) {
    assert_eq!(
        render(backend, ".btn{ class: \"primary\" }", json!({})),
        "<div class=\"btn primary\"></div>"
    );
    assert_eq!(
        render(backend, "%a.btn class=\"big\"", json!({})),
        "<a class=\"btn big\"></a>"
    );
    let source = ".btn{ class: {{ kind }} }";
    assert_eq!(
        render(backend, source, json!({"kind": "danger"})),
        "<div class=\"btn danger\"></div>"
    );
    assert_eq!(
        render(backend, source, json!({"kind": ""})),
        "<div class=\"btn\"></div>"
    );
    assert_eq!(
        render(backend, source, json!({"kind": false})),
        "<div class=\"btn\"></div>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_class_without_shorthand_replaces(backend: Backend) {
    assert_eq!(
        render(backend, "%p{ class: \"a\" } class=\"b\"", json!({})),
        "<p class=\"b\"></p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_multi_line_attributes(backend: Backend) {
    let source = "%input\n  type=\"checkbox\"\n\n  checked={{ done }}\n%p after";
    assert_eq!(
        render(backend, source, json!({"done": true})),
        "<input type=\"checkbox\" checked></input><p>after</p>"
    );
    assert_eq!(
        render(backend, source, json!({"done": false})),
        "<input type=\"checkbox\"></input><p>after</p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_continuation_run_ends_at_content(backend: Backend) {
    assert_eq!(
        render(backend, ".row\n  class=\"wide\"\n  %span x", json!({})),
        "<div class=\"row wide\"><span>x</span></div>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_continuation_key_must_start_with_word_character(backend: Backend) {
    assert_eq!(
        render(backend, "%div\n  -foo=\"x\"", json!({})),
        "<div>-foo=\"x\"</div>"
    );
    assert_eq!(
        render(backend, "%div\n  data-foo=\"x\"", json!({})),
        "<div data-foo=\"x\"></div>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_whole_value_expression_with_inner_braces(backend: Backend) {
    assert_eq!(
        render(backend, "%p{ data: {{ {a: {b: 1}}.a.b }} }", json!({})),
        "<p data=\"1\"></p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_malformed_heads_degrade_to_text(backend: Backend) {
    assert_eq!(render(backend, "% not a tag", json!({})), "% not a tag");
    assert_eq!(
        render(backend, "%p{ title: \"never closed\"", json!({})),
        "<p>{ title: \"never closed\"</p>"
    );
}

#[test]
fn test_tree_shape_through_loader() {
    let template = TemplateLoader::from_string("%a.btn{ href: \"/\" } Go")
        .compile()
        .unwrap();
    let tree = serde_json::to_value(template.nodes()).unwrap();
    let element = &tree[0];
    assert_eq!(element["tag"], "a");
    assert_eq!(
        element["attributes"]["class"],
        json!({"kind": "literal", "value": "btn"})
    );
    assert_eq!(element["children"][0]["value"], "Go");
}
