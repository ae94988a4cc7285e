//! Structural MI response matching (spec.md §4.3, §9: "treat it as a pure
//! function and unit-test it exhaustively").
//!
//! An expected shape is satisfied by a received message iff every key in the
//! expected object is present in the received object and:
//! (a) the expected value is `null` (any value matches), or
//! (b) both are objects and recursively match, or
//! (c) both are scalars and are equal, or
//! (d) expected is an array of objects, each of which must match against the
//!     value found at the same key in the received object.

use serde_json::Value;

/// One shape a response may satisfy. `None` entries ("wait for any of these
/// shapes") come from a list of [`Expected`].
#[derive(Debug, Clone)]
pub struct Expected(pub Value);

impl Expected {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

/// Returns whether `received` satisfies `expected` under the rules above.
#[must_use]
pub fn check(received: &Value, expected: &Value) -> bool {
    let Some(expected_obj) = expected.as_object() else {
        return received == expected;
    };
    let Some(received_obj) = received.as_object() else {
        return false;
    };

    for (key, expected_value) in expected_obj {
        let Some(received_value) = received_obj.get(key) else {
            return false;
        };

        let matches = if expected_value.is_null() {
            true
        } else if expected_value.is_object() {
            check(received_value, expected_value)
        } else if let Some(list) = expected_value.as_array() {
            list.iter().all(|case| {
                if case.is_object() {
                    check(received_value, case)
                } else {
                    true
                }
            })
        } else {
            received_value == expected_value
        };

        if !matches {
            return false;
        }
    }

    true
}

/// Returns `true` if `received` satisfies any shape in `wait_for`.
#[must_use]
pub fn check_any(received: &Value, wait_for: &[Expected]) -> bool {
    wait_for.iter().any(|shape| check(received, &shape.0))
}

/// A response record is a fatal MI error iff its `message` field equals
/// `"error"`.
#[must_use]
pub fn is_error_record(msg: &Value) -> bool {
    msg.get("message").and_then(Value::as_str) == Some("error")
}
