use crate::mc::{AttributeError, AttributeType, AttributeValue, RegistrationMode, RegistrationTable};
use chrono::{DateTime, Utc};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Upstream {
    #[prost(oneof = "UpstreamContent", tags = "1, 2, 3, 4")]
    pub content: Option<UpstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum UpstreamContent {
    #[prost(message, tag = "1")]
    Ping(Ping),
    #[prost(message, tag = "2")]
    ActionArrived(ActionArrived),
    #[prost(message, tag = "3")]
    WithdrawAction(WithdrawAction),
    #[prost(message, tag = "4")]
    GetValue(GetValue),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActionArrived {
    /// Absent for liveness probes.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub attributes: Vec<Attribute>,
    #[prost(int64, tag = "3")]
    pub instance_id: i64,
    #[prost(bool, tag = "4")]
    pub report_progress: bool,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct WithdrawAction {
    #[prost(int64, tag = "1")]
    pub instance_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetValue {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    #[prost(oneof = "AttributeKind", tags = "1, 2, 3, 4, 5")]
    pub kind: Option<AttributeKind>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum AttributeKind {
    #[prost(double, tag = "1")]
    Double(f64),
    #[prost(int64, tag = "2")]
    Long(i64),
    #[prost(string, tag = "3")]
    String(String),
    #[prost(bool, tag = "4")]
    Boolean(bool),
    /// Milliseconds since the unix epoch.
    #[prost(int64, tag = "5")]
    TimeMs(i64),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Downstream {
    #[prost(oneof = "DownstreamContent", tags = "1, 2, 3, 4, 5")]
    pub content: Option<DownstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum DownstreamContent {
    #[prost(message, tag = "1")]
    Pong(Pong),
    #[prost(message, tag = "2")]
    Registered(Registered),
    #[prost(message, tag = "3")]
    ActionProgress(ActionProgress),
    #[prost(message, tag = "4")]
    ActionResult(ActionResult),
    #[prost(message, tag = "5")]
    ValueReply(ValueReply),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pong {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ActionProgress {
    #[prost(int64, tag = "1")]
    pub instance_id: i64,
    #[prost(uint32, tag = "2")]
    pub stage: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ActionResult {
    #[prost(int64, tag = "1")]
    pub instance_id: i64,
    #[prost(uint32, tag = "2")]
    pub code: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValueReply {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub value: Option<Attribute>,
}

/// Everything the adapter declared at startup, announced to each new client.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Registered {
    #[prost(bool, tag = "1")]
    pub update_if_exists: bool,
    #[prost(message, repeated, tag = "2")]
    pub parameters: Vec<ParameterDescriptor>,
    #[prost(message, repeated, tag = "3")]
    pub actions: Vec<ActionDescriptor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParameterDescriptor {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(enumeration = "AttributeTag", tag = "3")]
    pub raw_type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActionDescriptor {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, repeated, tag = "3")]
    pub arguments: Vec<ArgumentDescriptor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArgumentDescriptor {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(enumeration = "AttributeTag", tag = "2")]
    pub raw_type: i32,
    #[prost(bool, tag = "3")]
    pub optional: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AttributeTag {
    Double = 0,
    Long = 1,
    String = 2,
    Boolean = 3,
    Time = 4,
}

impl From<AttributeType> for AttributeTag {
    fn from(value: AttributeType) -> Self {
        match value {
            AttributeType::Double => AttributeTag::Double,
            AttributeType::Long => AttributeTag::Long,
            AttributeType::String => AttributeTag::String,
            AttributeType::Boolean => AttributeTag::Boolean,
            AttributeType::Time => AttributeTag::Time,
        }
    }
}

impl From<&AttributeValue> for Attribute {
    fn from(value: &AttributeValue) -> Self {
        let kind = match value {
            AttributeValue::Double(v) => AttributeKind::Double(*v),
            AttributeValue::Long(v) => AttributeKind::Long(*v),
            AttributeValue::String(v) => AttributeKind::String(v.clone()),
            AttributeValue::Boolean(v) => AttributeKind::Boolean(*v),
            AttributeValue::Time(t) => AttributeKind::TimeMs(t.timestamp_millis()),
        };
        Self { kind: Some(kind) }
    }
}

/// Converts wire attributes into typed values, keeping their order.
///
/// # Errors
/// [`AttributeError::Missing`] for an attribute without a value and
/// [`AttributeError::WrongType`] for a time outside the representable range.
pub fn attributes_from_wire(attributes: Vec<Attribute>) -> Result<Vec<AttributeValue>, AttributeError> {
    attributes
        .into_iter()
        .enumerate()
        .map(|(index, attr)| match attr.kind {
            None => Err(AttributeError::Missing { index }),
            Some(AttributeKind::Double(v)) => Ok(AttributeValue::Double(v)),
            Some(AttributeKind::Long(v)) => Ok(AttributeValue::Long(v)),
            Some(AttributeKind::String(v)) => Ok(AttributeValue::String(v)),
            Some(AttributeKind::Boolean(v)) => Ok(AttributeValue::Boolean(v)),
            Some(AttributeKind::TimeMs(ms)) => DateTime::<Utc>::from_timestamp_millis(ms)
                .map(AttributeValue::Time)
                .ok_or(AttributeError::WrongType { index }),
        })
        .collect()
}

impl From<&RegistrationTable> for Registered {
    fn from(table: &RegistrationTable) -> Self {
        Self {
            update_if_exists: table.mode() == RegistrationMode::UpdateIfExists,
            parameters: table
                .parameters()
                .iter()
                .map(|p| ParameterDescriptor {
                    name: p.name.clone(),
                    description: p.description.clone(),
                    raw_type: AttributeTag::from(p.raw_type) as i32,
                })
                .collect(),
            actions: table
                .actions()
                .iter()
                .map(|a| ActionDescriptor {
                    name: a.name.clone(),
                    description: a.description.clone(),
                    arguments: a
                        .arguments
                        .iter()
                        .map(|arg| ArgumentDescriptor {
                            name: arg.name.clone(),
                            raw_type: AttributeTag::from(arg.raw_type) as i32,
                            optional: arg.optional,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
