// ABOUTME: Table schema model extracted from DescribeTable responses
// ABOUTME: Converts between SDK table descriptions and CreateTable inputs

use crate::error::{MigratorError, Result};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode as SdkBillingMode, BillingModeSummary, KeySchemaElement,
    KeyType, ProvisionedThroughput, ProvisionedThroughputDescription, ScalarAttributeType,
    TableDescription,
};

/// Scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Number,
    Binary,
}

impl AttributeKind {
    fn to_sdk(self) -> ScalarAttributeType {
        match self {
            AttributeKind::String => ScalarAttributeType::S,
            AttributeKind::Number => ScalarAttributeType::N,
            AttributeKind::Binary => ScalarAttributeType::B,
        }
    }

    fn from_sdk(table: &str, value: &ScalarAttributeType) -> Result<Self> {
        match value {
            ScalarAttributeType::S => Ok(AttributeKind::String),
            ScalarAttributeType::N => Ok(AttributeKind::Number),
            ScalarAttributeType::B => Ok(AttributeKind::Binary),
            other => Err(MigratorError::InvalidSchema {
                table: table.to_string(),
                reason: format!("unknown attribute type '{}'", other.as_str()),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub kind: AttributeKind,
}

/// Role an attribute plays in the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// HASH key
    Partition,
    /// RANGE key
    Sort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    pub attribute_name: String,
    pub role: KeyRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingMode {
    #[default]
    Provisioned,
    PayPerRequest,
}

/// Everything needed to recreate a table in another account.
///
/// Retrieved once per table from the source and consumed once by
/// `CreateTable` in the destination. Order of attribute definitions and key
/// elements is preserved exactly as DynamoDB reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub attribute_definitions: Vec<AttributeDef>,
    pub key_schema: Vec<KeyElement>,
    pub provisioned_throughput: Throughput,
    pub billing_mode: BillingMode,
}

impl TableSchema {
    /// Extract the schema from a `DescribeTable` response.
    ///
    /// # Errors
    ///
    /// Returns `SchemaFieldMissing` when the description lacks
    /// `AttributeDefinitions`, `KeySchema` or `ProvisionedThroughput` (or one of
    /// the capacity values inside it), and `InvalidSchema` for attribute or key
    /// types this model cannot represent.
    pub fn from_description(table: &str, description: &TableDescription) -> Result<Self> {
        let missing = |field: &'static str| MigratorError::SchemaFieldMissing {
            table: table.to_string(),
            field,
        };

        let attribute_definitions = description
            .attribute_definitions
            .as_ref()
            .ok_or_else(|| missing("AttributeDefinitions"))?
            .iter()
            .map(|def| {
                Ok(AttributeDef {
                    name: def.attribute_name().to_string(),
                    kind: AttributeKind::from_sdk(table, def.attribute_type())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let key_schema = description
            .key_schema
            .as_ref()
            .ok_or_else(|| missing("KeySchema"))?
            .iter()
            .map(|element| {
                let role = match element.key_type() {
                    KeyType::Hash => KeyRole::Partition,
                    KeyType::Range => KeyRole::Sort,
                    other => {
                        return Err(MigratorError::InvalidSchema {
                            table: table.to_string(),
                            reason: format!("unknown key type '{}'", other.as_str()),
                        })
                    }
                };
                Ok(KeyElement {
                    attribute_name: element.attribute_name().to_string(),
                    role,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let throughput = description
            .provisioned_throughput
            .as_ref()
            .ok_or_else(|| missing("ProvisionedThroughput"))?;
        let provisioned_throughput = Throughput {
            read_capacity_units: throughput
                .read_capacity_units
                .ok_or_else(|| missing("ProvisionedThroughput.ReadCapacityUnits"))?,
            write_capacity_units: throughput
                .write_capacity_units
                .ok_or_else(|| missing("ProvisionedThroughput.WriteCapacityUnits"))?,
        };

        let billing_mode = match description
            .billing_mode_summary
            .as_ref()
            .and_then(|summary| summary.billing_mode())
        {
            Some(SdkBillingMode::PayPerRequest) => BillingMode::PayPerRequest,
            _ => BillingMode::Provisioned,
        };

        Ok(TableSchema {
            attribute_definitions,
            key_schema,
            provisioned_throughput,
            billing_mode,
        })
    }

    /// Build a table description carrying this schema, as `DescribeTable` would return it.
    pub fn to_description(&self, table: &str) -> Result<TableDescription> {
        let mut builder = TableDescription::builder()
            .table_name(table)
            .set_attribute_definitions(Some(self.sdk_attribute_definitions(table)?))
            .set_key_schema(Some(self.sdk_key_schema(table)?))
            .provisioned_throughput(
                ProvisionedThroughputDescription::builder()
                    .read_capacity_units(self.provisioned_throughput.read_capacity_units)
                    .write_capacity_units(self.provisioned_throughput.write_capacity_units)
                    .build(),
            );
        if self.billing_mode == BillingMode::PayPerRequest {
            builder = builder.billing_mode_summary(
                BillingModeSummary::builder()
                    .billing_mode(SdkBillingMode::PayPerRequest)
                    .build(),
            );
        }
        Ok(builder.build())
    }

    pub fn sdk_attribute_definitions(&self, table: &str) -> Result<Vec<AttributeDefinition>> {
        self.attribute_definitions
            .iter()
            .map(|def| {
                AttributeDefinition::builder()
                    .attribute_name(&def.name)
                    .attribute_type(def.kind.to_sdk())
                    .build()
                    .map_err(|e| invalid(table, e))
            })
            .collect()
    }

    pub fn sdk_key_schema(&self, table: &str) -> Result<Vec<KeySchemaElement>> {
        self.key_schema
            .iter()
            .map(|element| {
                let key_type = match element.role {
                    KeyRole::Partition => KeyType::Hash,
                    KeyRole::Sort => KeyType::Range,
                };
                KeySchemaElement::builder()
                    .attribute_name(&element.attribute_name)
                    .key_type(key_type)
                    .build()
                    .map_err(|e| invalid(table, e))
            })
            .collect()
    }

    /// Throughput to send with `CreateTable`; on-demand tables send none.
    pub fn sdk_provisioned_throughput(&self, table: &str) -> Result<Option<ProvisionedThroughput>> {
        if self.billing_mode == BillingMode::PayPerRequest {
            return Ok(None);
        }
        ProvisionedThroughput::builder()
            .read_capacity_units(self.provisioned_throughput.read_capacity_units)
            .write_capacity_units(self.provisioned_throughput.write_capacity_units)
            .build()
            .map(Some)
            .map_err(|e| invalid(table, e))
    }

    pub fn sdk_billing_mode(&self) -> SdkBillingMode {
        match self.billing_mode {
            BillingMode::Provisioned => SdkBillingMode::Provisioned,
            BillingMode::PayPerRequest => SdkBillingMode::PayPerRequest,
        }
    }
}

fn invalid(table: &str, err: impl std::fmt::Display) -> MigratorError {
    MigratorError::InvalidSchema {
        table: table.to_string(),
        reason: err.to_string(),
    }
}
