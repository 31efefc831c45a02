use crate::core::data_value::{parse_bool, parse_float};
use crate::core::DataType;

/// Narrowest type that every non-null value in a column parses as.
/// Tried in order: bigint, double, boolean; falls back to string.
pub fn infer_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let mut non_null = values.clone().into_iter().peekable();
    if non_null.peek().is_none() {
        return DataType::String;
    }
    let all = |pred: &dyn Fn(&str) -> bool| values.clone().into_iter().all(|v| pred(v.trim()));

    if all(&|v| v.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if all(&|v| parse_float(v).is_some()) {
        DataType::Float64
    } else if all(&|v| parse_bool(v).is_some()) {
        DataType::Boolean
    } else {
        DataType::String
    }
}
