use anyhow::{bail, Context, Result};

/// Process configuration, read once at startup and passed around by
/// reference. No global cache.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub database_url: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL missing")?;
        validate_database_url(&database_url)?;
        let api_key = std::env::var("API_KEY").context("API_KEY missing")?;
        if api_key.trim().is_empty() {
            bail!("API_KEY must not be empty");
        }
        Ok(Self {
            api_key,
            database_url,
        })
    }
}

fn validate_database_url(url: &str) -> Result<()> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(())
    } else {
        bail!("DATABASE_URL must use the postgres:// or postgresql:// scheme")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_postgres_schemes() {
        assert!(validate_database_url("postgres://user:pw@localhost/orgdir").is_ok());
        assert!(validate_database_url("postgresql://localhost/orgdir").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(validate_database_url("mysql://localhost/orgdir").is_err());
        assert!(validate_database_url("localhost/orgdir").is_err());
    }
}
