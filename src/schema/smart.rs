//! Smart fallback and reserved field types
//!
//! When no declaration matches a field name, resolution can still succeed by
//! inferring a type from the value's runtime shape. The three smart instances
//! (text, long, double) are created once per registry, alongside the reserved
//! primary-key and record-sink instances.

use super::field_type::ValueKind;
use super::registry::{FieldHandle, FieldRole};
use crate::fields::FieldInstance;

/// Handles of the smart and reserved instances inside a registry
#[derive(Clone, Copy, Debug)]
pub(crate) struct SmartHandles {
    pub text: FieldHandle,
    pub long: FieldHandle,
    pub double: FieldHandle,
    pub primary_key: FieldHandle,
    pub record_sink: FieldHandle,
}

impl SmartHandles {
    /// Append the smart and reserved instances to a registry under
    /// construction
    pub(crate) fn install(
        instances: &mut Vec<FieldInstance>,
        copy_edges: &mut Vec<Vec<(FieldHandle, String)>>,
        primary_key: &str,
        record_field: Option<&str>,
    ) -> Self {
        let mut push = |instance: fn(FieldHandle) -> FieldInstance| {
            let handle = instances.len();
            instances.push(instance(handle));
            copy_edges.push(Vec::new());
            handle
        };

        let text = push(|h| FieldInstance::smart(h, ValueKind::Text));
        let long = push(|h| FieldInstance::smart(h, ValueKind::Long));
        let double = push(|h| FieldInstance::smart(h, ValueKind::Double));

        let primary_handle = instances.len();
        instances.push(FieldInstance::reserved(
            primary_handle,
            primary_key.to_string(),
            FieldRole::PrimaryKey,
        ));
        copy_edges.push(Vec::new());

        let record_handle = instances.len();
        instances.push(FieldInstance::reserved(
            record_handle,
            record_field.unwrap_or("$record$").to_string(),
            FieldRole::RecordSink,
        ));
        copy_edges.push(Vec::new());

        Self {
            text,
            long,
            double,
            primary_key: primary_handle,
            record_sink: record_handle,
        }
    }
}
