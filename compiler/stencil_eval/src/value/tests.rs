use super::*;
use pretty_assertions::assert_eq;

#[test]
fn truthiness() {
    assert!(!Value::Number(0.0).is_truthy());
    assert!(Value::Number(-1.5).is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(Value::UInt(3).is_truthy());
    assert!(!Value::Boolean(false).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("x").is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(!Value::strv(Vec::<String>::new()).is_truthy());
    assert!(Value::Type(TypeDescriptor::new("Widget")).is_truthy());
}

#[test]
fn nan_is_truthy() {
    assert!(Value::Number(f64::NAN).is_truthy());
    assert!(!Value::Number(-0.0).is_truthy());
}

#[test]
fn null_handle_is_falsy() {
    let widget = TypeDescriptor::new("Widget");
    assert!(!Value::Native(NativeHandle::null(widget.clone())).is_truthy());
    assert!(Value::object(widget, Rc::new(7_u32)).is_truthy());
}

#[test]
fn number_display() {
    assert_eq!(format_number(5.0), "5");
    assert_eq!(format_number(-3.0), "-3");
    assert_eq!(format_number(2.5), "2.5");
    assert_eq!(format_number(1e20), "100000000000000000000");
    assert_eq!(Value::Number(7.0).to_string(), "7");
}

#[test]
fn repr_quotes_strings() {
    assert_eq!(Value::from("a\"b\n").repr(), "\"a\\\"b\\n\"");
    assert_eq!(Value::from("plain").to_string(), "plain");
    assert_eq!(Value::strv(["x", "y"]).repr(), "[\"x\", \"y\"]");
    assert_eq!(Value::Null.repr(), "null");
    assert_eq!(Value::Boolean(true).repr(), "true");
}

#[test]
fn enum_display_uses_nick() {
    let mode = TypeDescriptor::new("Mode");
    let value = Value::Enum(EnumValue::new(mode, 2, "fast"));
    assert_eq!(value.to_string(), "fast");
    assert_eq!(value.repr(), "<Mode.fast>");
    assert_eq!(value.type_name(), "Mode");
}

#[test]
fn type_descriptor_subtyping() {
    let object = TypeDescriptor::new("Object");
    let drawable = TypeDescriptor::new("Drawable");
    let widget = TypeDescriptor::derived("Widget", &object, &[drawable.clone()]);
    let button = TypeDescriptor::derived("Button", &widget, &[]);

    assert!(button.is_a(&widget));
    assert!(button.is_a(&object));
    assert!(button.is_a(&drawable));
    assert!(!widget.is_a(&button));

    let names: Vec<_> = button.ancestry().map(TypeDescriptor::name).collect();
    assert_eq!(names, vec!["Button", "Widget", "Object"]);
}

#[test]
fn handle_identity() {
    let widget = TypeDescriptor::new("Widget");
    let payload: Rc<dyn std::any::Any> = Rc::new(String::from("w"));
    let a = NativeHandle::object(widget.clone(), Rc::clone(&payload));
    let b = NativeHandle::object(widget.clone(), payload);
    let c = NativeHandle::object(widget.clone(), Rc::new(String::from("w")));

    assert!(a.same_object(&b));
    assert!(!a.same_object(&c));
    assert!(NativeHandle::null(widget.clone()).same_object(&NativeHandle::null(widget)));
    assert_eq!(a.downcast::<String>().map(String::as_str), Some("w"));
}

#[test]
fn string_iteration_yields_chars() {
    let items: Vec<_> = Value::from("hé!").iter().into_iter().flatten().collect();
    assert_eq!(
        items,
        vec![Value::from("h"), Value::from("é"), Value::from("!")]
    );
}

#[test]
fn strv_iteration_yields_elements() {
    let items: Vec<_> = Value::strv(["a", "b"]).iter().into_iter().flatten().collect();
    assert_eq!(items, vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn numbers_are_not_iterable() {
    assert!(Value::Number(1.0).iter().is_none());
}

#[test]
fn to_number_conversions() {
    assert_eq!(Value::Int(-4).to_number(), Some(-4.0));
    assert_eq!(Value::Boolean(true).to_number(), Some(1.0));
    assert_eq!(Value::from(" 2.5 ").to_number(), Some(2.5));
    assert_eq!(Value::from("two").to_number(), None);
    assert_eq!(Value::Null.to_number(), None);
}
