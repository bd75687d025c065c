//! End-to-end rendering scenarios
//!
//! Every case runs through both back ends; they must agree byte for byte.

use haml_compiler::haml::config::Backend;
use haml_compiler::{Context, Engine, Template};
use rstest::rstest;
use serde_json::{json, Value};

fn render(backend: Backend, source: &str, context: Value) -> String {
    Template::compile(source).render_on(backend, Engine::new(), &Context::from(context))
}

/// `depth` nested levels; every tenth level is a `- if true` instead of a `%div`.
fn nested_template(depth: usize) -> String {
    let mut source = String::new();
    for level in 0..depth {
        source.push_str(&"  ".repeat(level));
        source.push_str(if level % 10 == 5 { "- if true\n" } else { "%div\n" });
    }
    source.push_str(&"  ".repeat(depth));
    source.push_str("%span= x");
    source
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_plain_element(backend: Backend) {
    assert_eq!(render(backend, "%div", json!({})), "<div></div>");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_boolean_attribute(backend: Backend) {
    let source = "%button disabled={{ count == 1 }}";
    assert_eq!(
        render(backend, source, json!({"count": 1})),
        "<button disabled></button>"
    );
    assert_eq!(
        render(backend, source, json!({"count": 2})),
        "<button></button>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_nested_conditionals(backend: Backend) {
    let source = "- if count > 0\n  - if count % 2\n    odd\n  - else\n    even";
    assert_eq!(render(backend, source, json!({"count": 3})), "odd");
    assert_eq!(render(backend, source, json!({"count": 4})), "even");
    assert_eq!(render(backend, source, json!({"count": 0})), "");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_loop_with_interpolated_class(backend: Backend) {
    let source = "- for el in [1,2,3]\n  %span{ class: \"foo-{{ el }}\" }= el";
    assert_eq!(
        render(backend, source, json!({})),
        "<span class=\"foo-1\">1</span><span class=\"foo-2\">2</span><span class=\"foo-3\">3</span>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_shorthand_container(backend: Backend) {
    assert_eq!(
        render(backend, ".container\n  %p Content", json!({})),
        "<div class=\"container\"><p>Content</p></div>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_empty_templates(backend: Backend) {
    assert_eq!(render(backend, "", json!({"a": 1})), "");
    assert_eq!(render(backend, "   \n\n\t \n", json!({})), "");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_else_if_chain(backend: Backend) {
    let source = "- if n == 1\n  one\n- elsif n == 2\n  two\n- else if n == 3\n  three\n- else\n  many";
    assert_eq!(render(backend, source, json!({"n": 1})), "one");
    assert_eq!(render(backend, source, json!({"n": 2})), "two");
    assert_eq!(render(backend, source, json!({"n": 3})), "three");
    assert_eq!(render(backend, source, json!({"n": 9})), "many");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_chain_without_else(backend: Backend) {
    let source = "- if a\n  A\n- else if b\n  B\nafter";
    assert_eq!(render(backend, source, json!({"a": false, "b": false})), "after");
    assert_eq!(render(backend, source, json!({"a": false, "b": true})), "Bafter");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_loop_index_and_shadowing(backend: Backend) {
    let source = "%ul\n  - for x, i in xs\n    %li= i + ':' + x\n%p= x";
    assert_eq!(
        render(backend, source, json!({"xs": ["a", "b"], "x": "outer"})),
        "<ul><li>0:a</li><li>1:b</li></ul><p>outer</p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_loop_over_non_sequence(backend: Backend) {
    let source = "- for x in items\n  %i= x";
    assert_eq!(render(backend, source, json!({"items": 5})), "");
    assert_eq!(render(backend, source, json!({"items": "abc"})), "");
    assert_eq!(render(backend, source, json!({})), "");
    assert_eq!(render(backend, source, json!({"items": []})), "");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_orphan_control_nodes_are_inert(backend: Backend) {
    assert_eq!(
        render(backend, "- else\n  hidden\nshown", json!({})),
        "shown"
    );
    assert_eq!(
        render(backend, "%p\n  - elsif true\n    hidden", json!({})),
        "<p></p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_escaping_and_raw_output(backend: Backend) {
    let context = json!({"html": "<i class=\"x\">Tom & 'Jerry'</i>"});
    assert_eq!(
        render(backend, "= html", context.clone()),
        "&lt;i class=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/i&gt;"
    );
    assert_eq!(
        render(backend, "= raw html", context),
        "<i class=\"x\">Tom & 'Jerry'</i>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_text_interpolation(backend: Backend) {
    assert_eq!(
        render(backend, "Hello, {{ name }}!", json!({"name": "<b>"})),
        "Hello, &lt;b&gt;!"
    );
    assert_eq!(
        render(backend, "%p <em>{{ a }}</em> and {{ b }}", json!({"a": 1, "b": null})),
        "<p><em>1</em> and </p>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_value_forms(backend: Backend) {
    assert_eq!(render(backend, "= flag", json!({"flag": true})), "true");
    assert_eq!(render(backend, "= 1.5 * 2", json!({})), "3");
    assert_eq!(render(backend, "= 7 / 2", json!({})), "3.5");
    assert_eq!(render(backend, "= xs", json!({"xs": [1, "a"]})), "1,a");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_failures_fall_back(backend: Backend) {
    assert_eq!(render(backend, "%p= user.name", json!({})), "<p></p>");
    assert_eq!(
        render(backend, "%p= user.name", json!({"user": null})),
        "<p></p>"
    );
    assert_eq!(render(backend, "%p= a b", json!({})), "<p></p>");
    assert_eq!(render(backend, "%p= 1 / 0", json!({})), "<p></p>");
    assert_eq!(
        render(backend, "- if missing.flag\n  yes\n- else\n  no", json!({})),
        "no"
    );
    assert_eq!(
        render(backend, "%a{ title: {{ nope() }} } x", json!({})),
        "<a>x</a>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_statements_emit_nothing(backend: Backend) {
    assert_eq!(render(backend, "- 1 + 1\n%p", json!({})), "<p></p>");
    assert_eq!(render(backend, "- log(x)\n%p", json!({})), "<p></p>");
    assert_eq!(render(backend, "- x = = 1\n%p", json!({})), "<p></p>");
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_escaped_dash(backend: Backend) {
    assert_eq!(
        render(backend, "\\- if this is text", json!({})),
        "- if this is text"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_host_function(backend: Backend) {
    let engine = Engine::new().with_function("isMax", |args: &[Value]| {
        Ok(Value::Bool(args.first() == Some(&json!(10))))
    });
    let template = Template::compile("- for n in [9, 10]\n  %li{ class: {{ isMax(n) ? 'max' : null }} }= n");
    assert_eq!(
        template.render_on(backend, engine, &Context::new()),
        "<li>9</li><li class=\"max\">10</li>"
    );
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_thousands_of_siblings(backend: Backend) {
    let source = (0..3000)
        .map(|i| format!("%p= x + {}", i))
        .collect::<Vec<_>>()
        .join("\n");
    let expected: String = (0..3000).map(|i| format!("<p>a{}</p>", i)).collect();
    let context = json!({"x": "a"});
    assert_eq!(render(backend, &source, context), expected);
}

#[test]
fn test_back_ends_agree_on_large_flat_template() {
    let source = (0..3000)
        .map(|i| match i % 3 {
            0 => format!("%li.item{{ data: {{{{ n + {} }}}} }} entry", i),
            1 => "plain text {{ n }}".to_string(),
            _ => "- if n > 1\n  %b= n\n- else\n  %i none".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let template = Template::compile(&source);
    let context = Context::from(json!({"n": 2}));
    let walked = template.render_on(Backend::TreeWalk, Engine::new(), &context);
    let generated = template.render_on(Backend::Generated, Engine::new(), &context);
    assert!(walked.contains("<li class=\"item\" data=\"2999\">entry</li>"));
    assert_eq!(walked, generated);
}

#[rstest(backend => [Backend::TreeWalk, Backend::Generated])]
fn test_deeply_nested_template(backend: Backend) {
    let depth = 120;
    let elements = depth - depth / 10;
    let expected = format!(
        "{}<span>a</span>{}",
        "<div>".repeat(elements),
        "</div>".repeat(elements)
    );
    assert_eq!(render(backend, &nested_template(depth), json!({"x": "a"})), expected);
}

#[test]
fn test_back_ends_agree_on_deep_template() {
    let template = Template::compile(&nested_template(150));
    let context = Context::from(json!({"x": "<deep>"}));
    assert_eq!(
        template.render_on(Backend::TreeWalk, Engine::new(), &context),
        template.render_on(Backend::Generated, Engine::new(), &context)
    );
}
