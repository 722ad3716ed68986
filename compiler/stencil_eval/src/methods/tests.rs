use super::*;
use crate::errors::ErrorCode;
use pretty_assertions::assert_eq;

fn call(receiver: impl Into<Value>, method: &str) -> EvalResult {
    dispatch_core_method(&receiver.into(), method, &[])
}

fn text(receiver: &str, method: &str) -> String {
    match call(receiver, method) {
        Ok(Value::Str(s)) => s.to_string(),
        other => panic!("{method} on {receiver:?} returned {other:?}"),
    }
}

#[test]
fn case_methods() {
    assert_eq!(text("Hello", "upper"), "HELLO");
    assert_eq!(text("Hello", "lower"), "hello");
    assert_eq!(text("ÄBC", "casefold"), "äbc");
}

#[test]
fn reverse_is_by_character() {
    assert_eq!(text("abc", "reverse"), "cba");
    assert_eq!(text("héllo", "reverse"), "olléh");
}

#[test]
fn len_counts_bytes() {
    assert_eq!(call("abc", "len").ok(), Some(Value::UInt(3)));
    assert_eq!(call("é", "len").ok(), Some(Value::UInt(2)));
    assert_eq!(call("", "len").ok(), Some(Value::UInt(0)));
}

#[test]
fn space_matches_byte_length() {
    assert_eq!(text("abc", "space"), "   ");
    assert_eq!(text("", "space"), "");
}

#[test]
fn escape_uses_c_escapes() {
    assert_eq!(text("a\"b\\c", "escape"), "a\\\"b\\\\c");
    assert_eq!(text("line\n\ttab", "escape"), "line\\n\\ttab");
    assert_eq!(text("\u{1}", "escape"), "\\001");
    assert_eq!(text("é", "escape"), "\\303\\251");
}

#[test]
fn escape_markup_replaces_entities() {
    assert_eq!(
        text("<a href=\"x\">Tom & Jerry's</a>", "escape_markup"),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
    );
}

#[test]
fn title_capitalizes_words() {
    assert_eq!(text("hello world", "title"), "Hello World");
    assert_eq!(text("my-widget_name", "title"), "My Widget Name");
    assert_eq!(text("  leading", "title"), "Leading");
    assert_eq!(text("a!!b", "title"), "A B");
    assert_eq!(text("mIxed", "title"), "MIxed");
}

#[test]
fn mangle_converts_camel_case() {
    assert_eq!(text("GtkWidget", "mangle"), "gtk_widget");
    assert_eq!(text("fooBar", "mangle"), "foo_bar");
    assert_eq!(text("lower", "mangle"), "lower");
}

#[test]
fn unknown_string_method() {
    assert_eq!(
        call("x", "explode").err().map(|e| e.code()),
        Some(ErrorCode::NoSuchMethod)
    );
}

#[test]
fn string_methods_take_no_arguments() {
    let result = dispatch_core_method(&Value::from("x"), "upper", &[Value::Null]);
    assert_eq!(result.err().map(|e| e.code()), Some(ErrorCode::SyntaxError));
}

#[test]
fn enum_nick() {
    let color = TypeDescriptor::new("Color");
    let red = Value::Enum(EnumValue::new(color, 1, "red"));
    assert_eq!(dispatch_core_method(&red, "nick", &[]).ok(), Some(Value::from("red")));
    assert_eq!(
        dispatch_core_method(&red, "name", &[]).err().map(|e| e.code()),
        Some(ErrorCode::NoSuchMethod)
    );
}

#[test]
fn type_name_and_subtyping() {
    let object = TypeDescriptor::new("Object");
    let widget = TypeDescriptor::derived("Widget", &object, &[]);
    let widget_value = Value::Type(widget);

    assert_eq!(
        dispatch_core_method(&widget_value, "name", &[]).ok(),
        Some(Value::from("Widget"))
    );
    assert_eq!(
        dispatch_core_method(&widget_value, "is_a", &[Value::Type(object.clone())]).ok(),
        Some(Value::Boolean(true))
    );
    assert_eq!(
        dispatch_core_method(&Value::Type(object), "is_a", &[widget_value.clone()]).ok(),
        Some(Value::Boolean(false))
    );
    assert_eq!(
        dispatch_core_method(&widget_value, "is_a", &[Value::from("Object")])
            .err()
            .map(|e| e.code()),
        Some(ErrorCode::TypeMismatch)
    );
    assert_eq!(
        dispatch_core_method(&widget_value, "is_a", &[])
            .err()
            .map(|e| e.code()),
        Some(ErrorCode::SyntaxError)
    );
}

#[test]
fn core_receivers() {
    assert!(is_core_receiver(&Value::from("s")));
    assert!(is_core_receiver(&Value::Type(TypeDescriptor::new("T"))));
    assert!(!is_core_receiver(&Value::Null));
    assert!(!is_core_receiver(&Value::Number(1.0)));
}

#[test]
fn method_table_matches_dispatch() {
    let color = TypeDescriptor::new("Color");
    let mut sorted = CORE_METHODS.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, CORE_METHODS.to_vec());

    for &(receiver, method) in CORE_METHODS {
        let (value, args) = match receiver {
            "string" => (Value::from("abc"), vec![]),
            "enum" => (Value::Enum(EnumValue::new(color.clone(), 0, "none")), vec![]),
            "type" if method == "is_a" => (
                Value::Type(color.clone()),
                vec![Value::Type(color.clone())],
            ),
            "type" => (Value::Type(color.clone()), vec![]),
            other => panic!("unexpected receiver {other}"),
        };
        let result = dispatch_core_method(&value, method, &args);
        assert!(result.is_ok(), "{receiver}.{method} failed: {result:?}");
    }
}
