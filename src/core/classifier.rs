//! Splitting caller arguments into format arguments and structured fields

use super::field::{Field, FieldValue};
use super::template::sprintf;

/// One caller-supplied argument: either a positional format value or a
/// pre-built structured field.
///
/// Most values convert with `Arg::from` / `.into()`; the logging macros do
/// this for every argument.
///
/// # Example
///
/// ```
/// use request_logger::{split_args, Arg, Field};
///
/// let (message, fields) = split_args(
///     "user %s logged in",
///     &[Arg::from("alice"), Arg::from(Field::new("uid", 7))],
/// );
/// assert_eq!(message, "user alice logged in");
/// assert_eq!(fields, vec![Field::new("uid", 7)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(FieldValue),
    Field(Field),
}

impl Arg {
    /// Positional argument from any displayable value
    pub fn display(value: impl std::fmt::Display) -> Self {
        Arg::Value(FieldValue::String(value.to_string()))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Arg::Field(_))
    }
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl From<FieldValue> for Arg {
    fn from(value: FieldValue) -> Self {
        Arg::Value(value)
    }
}

macro_rules! impl_arg_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Arg {
                fn from(value: $source) -> Self {
                    Arg::Value(FieldValue::from(value))
                }
            }
        )+
    };
}

impl_arg_from!(
    &str, String, &String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

/// Format `template` with the non-field arguments and collect the fields.
///
/// Both partitions keep the caller's relative order.
pub fn split_args(template: &str, args: &[Arg]) -> (String, Vec<Field>) {
    let mut positional = Vec::with_capacity(args.len());
    let mut fields = Vec::new();

    for arg in args {
        match arg {
            Arg::Field(field) => fields.push(field.clone()),
            Arg::Value(value) => positional.push(value.clone()),
        }
    }

    (sprintf(template, &positional), fields)
}
