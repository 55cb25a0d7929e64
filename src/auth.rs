//! Mock authentication port.
//!
//! A fixed in-memory credential table plus bearer sessions persisted to a
//! JSON file under the app data directory (the local-storage analog of the
//! console). This is a stand-in for a real identity provider; the
//! prescription core never depends on it: it receives the signed-in
//! doctor's identity fields directly.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorization::Role;
use crate::services::{DR_BENALI, DR_MEZIANE};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Cannot persist sessions: {0}")]
    Persist(#[from] std::io::Error),
}

/// One entry of the fixed credential table.
#[derive(Debug, Clone)]
pub struct Credential {
    pub email: &'static str,
    pub password: &'static str,
    pub display_name: &'static str,
    pub role: Role,
    /// Set when the account belongs to a prescriber.
    pub doctor_id: Option<Uuid>,
}

/// The console's hard-coded accounts. Mock data; every password is
/// fictional and the table ships with the binary.
pub fn credential_table() -> Vec<Credential> {
    vec![
        Credential {
            email: "direction@ordocare.dz",
            password: "direction-2026",
            display_name: "Direction Ordocare",
            role: Role::SuperUser,
            doctor_id: None,
        },
        Credential {
            email: "admin@clinique-elazhar.dz",
            password: "admin-2026",
            display_name: "Administration El Azhar",
            role: Role::ClinicAdmin,
            doctor_id: None,
        },
        Credential {
            email: "l.benali@clinique-elazhar.dz",
            password: "benali-2026",
            display_name: "Dr. Leila Benali",
            role: Role::Doctor,
            doctor_id: Some(DR_BENALI),
        },
        Credential {
            email: "k.meziane@clinique-elazhar.dz",
            password: "meziane-2026",
            display_name: "Dr. Karim Meziane",
            role: Role::Doctor,
            doctor_id: Some(DR_MEZIANE),
        },
        Credential {
            email: "infirmerie@clinique-elazhar.dz",
            password: "infirmerie-2026",
            display_name: "Infirmerie El Azhar",
            role: Role::Nurse,
            doctor_id: None,
        },
        Credential {
            email: "pharmacie@clinique-elazhar.dz",
            password: "pharmacie-2026",
            display_name: "Pharmacie El Azhar",
            role: Role::Pharmacy,
            doctor_id: None,
        },
    ]
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a bearer token for storage; only hashes ever touch disk.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Authenticated console session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub doctor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Bearer sessions keyed by token hash, persisted as JSON.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    /// Load persisted sessions; a missing or unreadable file starts empty.
    pub fn load(path: &Path) -> Self {
        let sessions = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(%err, "session file corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            sessions,
        }
    }

    /// Check an email/password pair against the credential table and open
    /// a session. Returns the raw bearer token exactly once.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(String, Session), AuthError> {
        let account = credential_table()
            .into_iter()
            .find(|c| c.email.eq_ignore_ascii_case(email.trim()) && c.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let token = generate_token();
        let session = Session {
            user_name: account.display_name.into(),
            email: account.email.into(),
            role: account.role,
            doctor_id: account.doctor_id,
            created_at: Utc::now(),
        };
        self.sessions.insert(hash_token(&token), session.clone());
        self.persist()?;
        Ok((token, session))
    }

    pub fn validate(&self, token: &str) -> Option<&Session> {
        self.sessions.get(&hash_token(token))
    }

    /// Revoke the session for this token. Returns `false` when the token
    /// was not known.
    pub fn logout(&mut self, token: &str) -> Result<bool, AuthError> {
        let removed = self.sessions.remove(&hash_token(token)).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.sessions)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}
