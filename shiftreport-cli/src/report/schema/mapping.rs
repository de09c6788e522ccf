//! Per-type column mappings onto the canonical record fields
//!
//! Each record type has one declarative table of rules. A rule lists the
//! source columns that may feed a canonical field (first present wins) and
//! what to do when none of them exists. Binding a mapping to a concrete
//! header resolves every rule once, so row normalization never has to look
//! at the record type again.

use std::fmt;

use crate::report::types::{Header, RecordType};

/// Canonical record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    ShiftReference,
    Amount,
    AttendantId,
    ClientId,
    PaymentMethod,
    Validator,
    IncomeChannel,
    VoucherOrMachine,
    Tip,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Timestamp => "timestamp",
            Field::ShiftReference => "shiftReference",
            Field::Amount => "amount",
            Field::AttendantId => "attendantId",
            Field::ClientId => "clientId",
            Field::PaymentMethod => "paymentMethod",
            Field::Validator => "validator",
            Field::IncomeChannel => "incomeChannel",
            Field::VoucherOrMachine => "voucherOrMachine",
            Field::Tip => "tip",
        };
        write!(f, "{}", name)
    }
}

/// What a rule falls back to when none of its columns exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Field stays empty
    Missing,
    /// Use the sheet's first column
    FirstColumn,
    /// Derive from the timestamp shifted back to the shift start
    ShiftFromTimestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub columns: &'static [&'static str],
    pub fallback: Fallback,
}

const fn rule(field: Field, columns: &'static [&'static str]) -> FieldRule {
    FieldRule {
        field,
        columns,
        fallback: Fallback::Missing,
    }
}

const fn rule_or(field: Field, columns: &'static [&'static str], fallback: Fallback) -> FieldRule {
    FieldRule {
        field,
        columns,
        fallback,
    }
}

/// Column mapping for one record type
#[derive(Debug, Clone, Copy)]
pub struct SchemaMapping {
    pub record_type: RecordType,
    pub rules: &'static [FieldRule],
}

pub const GETNET_MAPPING: SchemaMapping = SchemaMapping {
    record_type: RecordType::Getnet,
    rules: &[
        rule(Field::Timestamp, &["Fecha"]),
        rule(Field::ShiftReference, &["Jornada"]),
        rule(Field::Amount, &["Monto"]),
        rule(Field::AttendantId, &["Slot Attendant"]),
        rule(Field::ClientId, &["Id Cliente"]),
        rule(Field::PaymentMethod, &["Forma Pago"]),
        rule(Field::Validator, &["Validador"]),
        rule(Field::IncomeChannel, &["Ingreso CAWA"]),
        rule(Field::VoucherOrMachine, &["Voucher"]),
        rule(Field::Tip, &["Propina"]),
    ],
};

pub const PREMIOS_MAPPING: SchemaMapping = SchemaMapping {
    record_type: RecordType::Premios,
    rules: &[
        rule_or(Field::Timestamp, &["Fecha"], Fallback::FirstColumn),
        rule_or(Field::ShiftReference, &["Jornada"], Fallback::ShiftFromTimestamp),
        rule(Field::Amount, &["Transferencia Final"]),
        rule(Field::AttendantId, &["Slot Attendant"]),
        rule(Field::ClientId, &["Cliente", "Id Cliente"]),
        rule(Field::PaymentMethod, &["Tipo de Pago", "Forma Pago"]),
        rule(Field::Validator, &["Validador"]),
        rule(Field::IncomeChannel, &["Ingreso CAWA"]),
        rule(Field::VoucherOrMachine, &["Máquina", "Maquina", "Machine", "Slot"]),
        rule(Field::Tip, &["Propina"]),
    ],
};

/// Where a canonical field is read from for one concrete header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Column(usize),
    ShiftFromTimestamp,
    Missing,
}

/// A mapping resolved against a concrete header
#[derive(Debug, Clone)]
pub struct BoundSchema {
    pub record_type: RecordType,
    bindings: Vec<(Field, Binding)>,
}

impl BoundSchema {
    pub fn binding(&self, field: Field) -> Binding {
        self.bindings
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, b)| *b)
            .unwrap_or(Binding::Missing)
    }

    /// Fields that could not be bound to any column
    pub fn missing_fields(&self) -> Vec<Field> {
        self.bindings
            .iter()
            .filter(|(_, b)| *b == Binding::Missing)
            .map(|(f, _)| *f)
            .collect()
    }
}

impl SchemaMapping {
    pub fn for_type(record_type: RecordType) -> &'static SchemaMapping {
        match record_type {
            RecordType::Getnet => &GETNET_MAPPING,
            RecordType::Premios => &PREMIOS_MAPPING,
        }
    }

    /// Record type implied by a header's columns when no signature matched
    pub fn infer_type(header: &Header) -> RecordType {
        if header.contains("Transferencia Final") && header.contains("Slot Attendant") {
            RecordType::Premios
        } else {
            RecordType::Getnet
        }
    }

    /// Resolve every rule against the header
    pub fn bind(&self, header: &Header) -> BoundSchema {
        let bindings = self
            .rules
            .iter()
            .map(|rule| {
                let column = rule.columns.iter().find_map(|name| header.position(name));
                let binding = match (column, rule.fallback) {
                    (Some(col), _) => Binding::Column(col),
                    (None, Fallback::FirstColumn) if !header.is_empty() => Binding::Column(0),
                    (None, Fallback::ShiftFromTimestamp) => Binding::ShiftFromTimestamp,
                    (None, _) => Binding::Missing,
                };
                (rule.field, binding)
            })
            .collect();

        BoundSchema {
            record_type: self.record_type,
            bindings,
        }
    }
}
