//! Savepoints: MySQL only supports naming them, never retrieving a
//! numeric id, so `Savepoint::id()` is a guaranteed error rather than an `Option`.

use crate::error::{Error, Result};
use crate::mysql::connection::MySqlConnection;

/// `{ id: unsupported, name: string }`: a handle returned by
/// [`MySqlConnection::set_savepoint`].
#[derive(Debug, Clone)]
pub struct Savepoint {
    name: Box<str>,
}

impl Savepoint {
    /// Getting the id on a named-only savepoint MUST raise an SQL error.
    pub fn id(&self) -> Result<u64> {
        Err(Error::UnnamedSavepoint)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MySqlConnection {
    /// `set_savepoint(name?)`: generates a unique name when none is supplied, since
    /// the MySQL protocol has no concept of an unnamed savepoint.
    pub async fn set_savepoint(&mut self, name: Option<&str>) -> Result<Savepoint> {
        let name: Box<str> = match name {
            Some(name) => name.into(),
            None => {
                self.session.savepoint_counter += 1;
                format!("_ldbc_savepoint_{}", self.session.savepoint_counter).into()
            }
        };

        self.execute(&format!("SAVEPOINT `{}`", escape_identifier(&name)))
            .await?;

        Ok(Savepoint { name })
    }

    /// `rollback(savepoint)`.
    pub async fn rollback_to_savepoint(&mut self, savepoint: &Savepoint) -> Result<()> {
        self.execute(&format!(
            "ROLLBACK TO SAVEPOINT `{}`",
            escape_identifier(&savepoint.name)
        ))
        .await?;
        Ok(())
    }

    /// `release(savepoint)`.
    pub async fn release_savepoint(&mut self, savepoint: &Savepoint) -> Result<()> {
        self.execute(&format!("RELEASE SAVEPOINT `{}`", escape_identifier(&savepoint.name)))
            .await?;
        Ok(())
    }
}

/// Savepoint names are client-controlled (either caller-supplied or our own counter-based
/// generation), but backtick-quoted all the same; doubling an embedded backtick is the
/// standard MySQL identifier-escaping rule.
fn escape_identifier(name: &str) -> String {
    name.replace('`', "``")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_escapes_backticks_in_identifiers() {
        assert_eq!(escape_identifier("a`b"), "a``b");
    }

    #[test]
    fn id_is_always_an_error() {
        let savepoint = Savepoint { name: "s1".into() };
        assert!(savepoint.id().is_err());
    }
}
