use safehtml::{PolicyFactory, Sanitizers, StringSink};

#[test]
fn script() {
    let input = "\n            <script>alert('XSS!');</script>\n            \
                 <p>Hello world!</p>\n            <font size=\"20\">LARGE</font>\n        ";
    let expected =
        "\n            \n            <p>Hello world!</p>\n            LARGE\n        ";
    assert_eq!(safehtml::clean(input).unwrap(), expected);
}

#[test]
fn preserve_escaped() {
    let input = "\n            <p>Hello world!</p>\n            \
                 <font size=\"20\">LARGE</font>\n        ";
    let expected = "\n            <p>Hello world!</p>\n            &lt;font&gt;LARGE\n        ";

    let mut policy = Sanitizers::relaxed().apply(StringSink::new().with_preserve_escaped(true));
    policy.run(input).unwrap();
    assert_eq!(policy.into_sink().into_inner(), expected);
}

#[test]
fn builder_custom_policy_smoke_test() {
    let factory = PolicyFactory::builder().allow_element("b").build();
    let out = factory.sanitize("<b onclick=alert(1)>hi</b>").unwrap();
    assert_eq!(out, "<b>hi</b>");
}
