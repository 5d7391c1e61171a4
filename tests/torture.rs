use insta::assert_snapshot;
use safehtml::{Sanitizers, StringSink};
use std::fs;

#[test]
fn torture() {
    insta::glob!("inputs/*", |path| {
        let input = fs::read_to_string(path).unwrap();
        assert_snapshot!(safehtml::clean(&input).unwrap());
    });
}

#[test]
fn torture_escaped() {
    insta::glob!("inputs/*", |path| {
        let input = fs::read_to_string(path).unwrap();
        let mut policy =
            Sanitizers::relaxed().apply(StringSink::new().with_preserve_escaped(true));
        policy.run(&input).unwrap();
        assert_snapshot!(policy.into_sink().into_inner());
    });
}
