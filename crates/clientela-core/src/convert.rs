// ── API-to-domain type conversions ──
//
// Bridges `clientela_api` wire types and the canonical domain model.
// Records are field-for-field; rejected-write errors keep the service's
// field name as text.

use clientela_api::{ApiFieldError, Cliente};

use crate::model::{Record, RemoteFieldError};

impl From<Cliente> for Record {
    fn from(c: Cliente) -> Self {
        Self {
            key: c.clave,
            contact_name: c.nombre_contacto,
            email: c.correo,
            phone: c.telefono_contacto,
        }
    }
}

impl From<Record> for Cliente {
    fn from(r: Record) -> Self {
        Self {
            clave: r.key,
            nombre_contacto: r.contact_name,
            correo: r.email,
            telefono_contacto: r.phone,
        }
    }
}

impl From<&Record> for Cliente {
    fn from(r: &Record) -> Self {
        r.clone().into()
    }
}

impl From<ApiFieldError> for RemoteFieldError {
    fn from(e: ApiFieldError) -> Self {
        Self {
            field: e.campo,
            message: e.mensaje,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn record_round_trips_through_wire_type() {
        let record = Record {
            key: "42".into(),
            contact_name: "Ana".into(),
            email: "ana@gmail.com".into(),
            phone: "9611234567".into(),
        };
        let wire = Cliente::from(&record);
        assert_eq!(wire.clave, "42");
        assert_eq!(wire.telefono_contacto, "9611234567");
        assert_eq!(Record::from(wire), record);
    }

    #[test]
    fn remote_error_keeps_unknown_field_names() {
        let known: RemoteFieldError = ApiFieldError {
            campo: "correo".into(),
            mensaje: "x".into(),
        }
        .into();
        assert_eq!(known.known_field(), Some(Field::Email));

        let unknown: RemoteFieldError = ApiFieldError {
            campo: "direccion".into(),
            mensaje: "x".into(),
        }
        .into();
        assert_eq!(unknown.known_field(), None);
        assert_eq!(unknown.field, "direccion");
    }
}
