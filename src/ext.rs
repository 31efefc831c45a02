//! Conversion of engine tables and local frames into lazy DataFrames.
//!
//! `to_dataframe` is only available on sessions started with
//! `auto_patch = true` (the default). [`Session::from_table`] and
//! [`Session::from_local`] work regardless.

use crate::core::Table;
use crate::dataframe::{DataFrame, LocalFrame};
use crate::error::{Error, Result};
use crate::session::Session;

/// Converts a value into a [`DataFrame`] bound to a session
pub trait ToDataFrame {
    fn to_dataframe(&self, session: &Session) -> Result<DataFrame>;
}

fn ensure_enabled(session: &Session) -> Result<()> {
    if session.conversion_enabled() {
        Ok(())
    } else {
        Err(Error::InvalidOperation(
            "to_dataframe is disabled for this session (auto_patch = false); use Session::from_table or Session::from_local".to_string(),
        ))
    }
}

impl ToDataFrame for Table {
    fn to_dataframe(&self, session: &Session) -> Result<DataFrame> {
        ensure_enabled(session)?;
        Ok(session.from_table(self.clone()))
    }
}

impl ToDataFrame for LocalFrame {
    fn to_dataframe(&self, session: &Session) -> Result<DataFrame> {
        ensure_enabled(session)?;
        Ok(session.from_local(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::core::Column;
    use crate::engine::LocalEngine;
    use std::sync::Arc;

    fn table() -> Table {
        Table::new(vec![Column::from_i64s("a", vec![1, 2])]).unwrap()
    }

    #[test]
    fn test_disabled_by_default_on_plain_sessions() {
        let session = Session::local();
        let err = table().to_dataframe(&session).unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
        assert_eq!(session.from_table(table()).count().unwrap(), 2);
    }

    #[test]
    fn test_enabled_session_converts() {
        let session = Session::from_parts(Arc::new(LocalEngine::new()), Options::new(), None, true);
        let df = table().to_dataframe(&session).unwrap();
        assert_eq!(df.columns().unwrap(), vec!["a"]);
        let local = LocalFrame::from_table(table());
        assert_eq!(local.to_dataframe(&session).unwrap().count().unwrap(), 2);
    }
}
