//! End-to-end conversion tests
//!
//! Small inputs are checked against exact Slim output; the fixtures under `fixtures/` are whole
//! templates pinned with insta snapshots.

use pretty_assertions::assert_eq;
use rstest::rstest;
use slim_babel::{convert, convert_bytes, ConvertOptions, FormatError};

fn slim(html: &str) -> String {
    convert(html, &ConvertOptions::default()).unwrap()
}

#[rstest]
#[case::simple_div("<div>Hello</div>", "div Hello\n")]
#[case::nested("<div><p>Hello</p></div>", "div\n  p Hello\n")]
#[case::siblings("<div>First</div><div>Second</div>", "div First\ndiv Second\n")]
#[case::empty("<div></div>", "div\n")]
#[case::void_elements(r#"<br><hr><img src="test.jpg">"#, "br\nhr\nimg[src=\"test.jpg\"]\n")]
#[case::id_shorthand(r#"<div id="main"><p>Hello</p></div>"#, "#main\n  p Hello\n")]
#[case::classes(
    r#"<div class="container fluid large">Content</div>"#,
    ".container.fluid.large Content\n"
)]
#[case::id_and_classes_on_other_tags(
    r#"<p id="intro" class="lead">Text</p>"#,
    "p#intro.lead Text\n"
)]
#[case::attributes(r#"<a href="/path">Link</a>"#, "a[href=\"/path\"] Link\n")]
#[case::single_quote_in_value(
    r#"<div data-text="It's here">Content</div>"#,
    "div[data-text=\"It's here\"] Content\n"
)]
#[case::double_quote_in_value(
    r#"<div data-text='Say "Hello"'>Content</div>"#,
    "div[data-text='Say \"Hello\"'] Content\n"
)]
#[case::shorthand_with_attributes(
    r#"<div id="main" class="container" data-role="navigation">Nav</div>"#,
    "#main.container[data-role=\"navigation\"] Nav\n"
)]
#[case::boolean_attribute(
    r#"<select><option value="uk" selected>United Kingdom</option></select>"#,
    "select\n  option[value=\"uk\" selected] United Kingdom\n"
)]
#[case::textarea(
    r#"<textarea name="message" rows="5" cols="30">Default text</textarea>"#,
    "textarea[name=\"message\" rows=\"5\" cols=\"30\"] Default text\n"
)]
fn test_elements(#[case] html: &str, #[case] expected: &str) {
    assert_eq!(slim(html), expected);
}

#[rstest]
#[case::inline("<p>This is a paragraph with text.</p>", "p This is a paragraph with text.\n")]
#[case::multiline("<div>\n  Line 1\n  Line 2\n</div>", "div\n  | Line 1\n  | Line 2\n")]
#[case::mixed(
    "<div>Text before <span>inline</span> text after</div>",
    "div\n  | Text before\n  span inline\n  | text after\n"
)]
#[case::collapsed_whitespace("<p>  lots   of\tspace </p>", "p lots of space\n")]
#[case::leading_slash(
    r#"<span class="fs-6 text-muted">/month</span>"#,
    "span.fs-6.text-muted\n  | /month\n"
)]
#[case::pre_marker(r"<pre>  Indented\n    More indented</pre>", "pre Indented\\n    More indented\n")]
#[case::pre_line_breaks("<pre>a\n   b\n c</pre>", "pre a\\n b\\n c\n")]
#[case::comment("<!-- This is a comment -->", "/! This is a comment\n")]
#[case::comment_in_element(
    "<div><!-- Comment --><p>Content</p></div>",
    "div\n  /! Comment\n  p Content\n"
)]
fn test_text_and_comments(#[case] html: &str, #[case] expected: &str) {
    assert_eq!(slim(html), expected);
}

#[rstest]
#[case::output("<div><%= @user.name %></div>", "div\n  = @user.name\n")]
#[case::conditional(
    "<div><% if @user %><p>Hello</p><% end %></div>",
    "div\n  - if @user\n    p Hello\n"
)]
#[case::attribute_directive(
    r#"<a href="<%= user_path(@user) %>">Profile</a>"#,
    "a[href=\"<%= user_path(@user) %>\"] Profile\n"
)]
#[case::loop_with_output(
    "<div><%= @title %><p>Static content</p><% @items.each do |item| %><li><%= item %></li><% end %></div>",
    "div\n  = @title\n  p Static content\n  - @items.each do |item|\n    li\n      = item\n"
)]
#[case::branches(
    "<% if a %><b>A</b><% elsif b %><i>B</i><% else %><u>C</u><% end %>",
    "- if a\n  b A\n- elsif b\n  i B\n- else\n  u C\n"
)]
#[case::unless("<% unless done %><p>Pending</p><% end %>", "- unless done\n  p Pending\n")]
#[case::plain_code("<% @count = 3 %><p><%= @count %></p>", "- @count = 3\np\n  = @count\n")]
#[case::raw_output("<%== @html %>", "== @html\n")]
#[case::erb_comment("<%# note to self %>", "- # note to self\n")]
#[case::multiline_output(
    "<%=\n  render partial: 'row',\n    collection: @rows\n%>",
    "= render partial: 'row', \\\n  collection: @rows\n"
)]
#[case::multiline_code(
    "<%\n  a = 1\n  b = 2\n%>",
    "ruby:\n  a = 1\n  b = 2\n"
)]
fn test_directives(#[case] html: &str, #[case] expected: &str) {
    assert_eq!(slim(html), expected);
}

#[rstest]
#[case::row_loop(
    "<table><% @rows.each do |r| %><tr><td><%= r.name %></td></tr><% end %></table>",
    "table\n  - @rows.each do |r|\n    tr\n      td\n        = r.name\n"
)]
#[case::branches_around_rows(
    "<table><tbody><% if @show %><tr><td>A</td></tr><% else %><tr><td>B</td></tr><% end %></tbody></table>",
    "table\n  tbody\n    - if @show\n      tr\n        td A\n    - else\n      tr\n        td B\n"
)]
#[case::cell_conditional(
    "<table><tr><% if @admin %><td>Edit</td><% end %></tr></table>",
    "table\n  tbody\n    tr\n      - if @admin\n        td Edit\n"
)]
#[case::option_loop(
    r#"<select name="x"><% @opts.each do |o| %><option><%= o %></option><% end %></select>"#,
    "select[name=\"x\"]\n  - @opts.each do |o|\n    option\n      = o\n"
)]
fn test_directives_in_tables_and_selects(#[case] html: &str, #[case] expected: &str) {
    assert_eq!(slim(html), expected);
}

#[test]
fn test_directive_code_keeps_inner_whitespace() {
    assert_eq!(
        slim(r#"<% label = "a    b" %><% if name == "x  y" %><p>Hi</p><% end %>"#),
        "- label = \"a    b\"\n- if name == \"x  y\"\n  p Hi\n"
    );
}

#[test]
fn test_ruby_block_keeps_nesting() {
    let html = "<%\n  sql = <<-SQL\n    SELECT *\n      FROM t\n  SQL\n  if sql\n    run(sql)\n  end\n%>";
    assert_eq!(
        slim(html),
        "ruby:\n  sql = <<-SQL\n    SELECT *\n      FROM t\n  SQL\n  if sql\n    run(sql)\n  end\n"
    );
}

#[test]
fn test_directive_in_head_stays_in_head() {
    assert_eq!(
        slim("<html><head><% if @rss %><link rel=\"alternate\"><% end %></head><body></body></html>"),
        "html\n  head\n    - if @rss\n      link[rel=\"alternate\"]\n  body\n"
    );
}

#[rstest]
#[case("<!DOCTYPE html><html><body><p>Hi</p></body></html>", "doctype html\nhtml\n  head\n  body\n    p Hi\n")]
#[case(
    r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "x.dtd"><p>Hi</p>"#,
    "doctype strict\np Hi\n"
)]
fn test_doctype(#[case] html: &str, #[case] expected: &str) {
    assert_eq!(slim(html), expected);
}

#[test]
fn test_whole_document_gets_implied_head_and_body() {
    assert_eq!(
        slim("<html><title>T</title><p>x</p></html>"),
        "html\n  head\n    title T\n  body\n    p x\n"
    );
}

#[test]
fn test_custom_indent_width() {
    let output = convert("<div><p>Text</p></div>", &ConvertOptions::new(4)).unwrap();
    assert_eq!(output, "div\n    p Text\n");
}

#[test]
fn test_empty_input_is_a_single_newline() {
    assert_eq!(slim(""), "\n");
    assert_eq!(slim("   \n  "), "\n");
}

#[test]
fn test_invalid_utf8_is_a_parse_input_error() {
    let result = convert_bytes(&[0x3c, 0x70, 0x3e, 0xff, 0xfe], &ConvertOptions::default());
    assert!(matches!(result, Err(FormatError::ParseInput(_))));
}

#[test]
fn test_complex_nesting_contains_expected_lines() {
    let html = r#"
        <div id="wrapper" class="container">
          <header>
            <h1>Title</h1>
            <nav>
              <ul>
                <li><a href="/">Home</a></li>
                <li><a href="/about">About</a></li>
              </ul>
            </nav>
          </header>
          <main>
            <article class="post">
              <h2>Post Title</h2>
              <p>Content here</p>
            </article>
          </main>
        </div>
    "#;
    let expected = [
        "#wrapper.container",
        "  header",
        "    h1 Title",
        "    nav",
        "      ul",
        "        li",
        "          a[href=\"/\"] Home",
        "        li",
        "          a[href=\"/about\"] About",
        "  main",
        "    article.post",
        "      h2 Post Title",
        "      p Content here",
    ]
    .join("\n")
        + "\n";
    assert_eq!(slim(html), expected);
}

#[test]
fn test_layout_fixture() {
    let output = slim(include_str!("fixtures/layout.html.erb"));
    insta::assert_snapshot!("layout", output.trim_end());
}

#[test]
fn test_form_fixture() {
    let output = slim(include_str!("fixtures/form.html.erb"));
    insta::assert_snapshot!("form", output.trim_end());
}
