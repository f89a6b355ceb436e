use crate::cli::parser::{Commands, CredentialAction};
use crate::config::Config;
use crate::core::ports::{CredentialProvider, StoredCredentialProvider};
use crate::db::log::rclog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Device credential surface: enroll or check.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Credential { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;
    let provider = StoredCredentialProvider::new(&pool.conn);

    match action {
        CredentialAction::Enroll { name } => {
            let credential_id = provider.register(&cfg.student_id, name)?;

            let _ = rclog(
                &pool.conn,
                "credential",
                &cfg.student_id,
                &format!("Enrolled credential '{}'", name),
            );

            success(format!(
                "Enrolled '{}' for {} ({})",
                name, cfg.student_id, credential_id
            ));
        }

        CredentialAction::Check => {
            if provider.authenticate(&cfg.student_id)? {
                success(format!("Credential enrolled for {}.", cfg.student_id));
            } else {
                warning(format!(
                    "No credential enrolled for {} — run 'rollcall credential enroll'.",
                    cfg.student_id
                ));
            }
        }
    }

    Ok(())
}
