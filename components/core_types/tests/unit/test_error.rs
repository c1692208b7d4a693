//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, Value};

mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let kind1 = ErrorKind::TypeError;
        let kind2 = kind1;
        assert_eq!(kind1, kind2);
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::RangeError.to_string(), "RangeError");
        assert_eq!(ErrorKind::InternalError.to_string(), "InternalError");
    }
}

mod js_error_tests {
    use super::*;

    #[test]
    fn test_type_error_constructor() {
        let error = JsError::type_error("42 is not iterable");
        assert_eq!(error.kind, ErrorKind::TypeError);
        assert_eq!(error.message, "42 is not iterable");
    }

    #[test]
    fn test_display_includes_kind() {
        let error = JsError::error("Ошибка");
        assert_eq!(format!("{}", error), "Error: Ошибка");
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(JsError::type_error("bad"));
        assert_eq!(error.to_string(), "TypeError: bad");
    }

    #[test]
    fn test_error_converts_to_value() {
        let value = Value::from(JsError::type_error("bad"));
        assert!(matches!(value, Value::Error(ref e) if e.kind == ErrorKind::TypeError));
        assert_eq!(value.get("name"), Ok(Value::from("TypeError")));
        assert_eq!(value.get("then"), Ok(Value::Undefined));
    }
}
