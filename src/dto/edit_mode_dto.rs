use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VerifyPassphraseRequest {
    pub passphrase: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPassphraseResponse {
    pub valid: bool,
    /// `false` si el servidor no exige frase de acceso
    pub required: bool,
}
