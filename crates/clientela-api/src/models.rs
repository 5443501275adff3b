// Registry service wire types
//
// Field names follow the service's JSON exactly. Fields use
// `#[serde(default)]` liberally because list payloads are not guaranteed
// to carry every attribute.

use serde::{Deserialize, Serialize};

// ── Record ───────────────────────────────────────────────────────────

/// A customer record as sent to and received from the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    #[serde(default)]
    pub clave: String,
    #[serde(rename = "nombreContacto", default)]
    pub nombre_contacto: String,
    #[serde(default)]
    pub correo: String,
    #[serde(rename = "telefonoContacto", default)]
    pub telefono_contacto: String,
}

// ── Errors ───────────────────────────────────────────────────────────

/// A single field-level error reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFieldError {
    pub campo: String,
    #[serde(default)]
    pub mensaje: String,
}

/// Error body returned on rejected writes: `{"errores": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub errores: Option<Vec<ApiFieldError>>,
}
