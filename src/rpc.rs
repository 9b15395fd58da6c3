//! The RPC boundary: JSON-RPC error objects and call-site hooks.
//!
//! A transport that dispatches methods described by the same contract
//! uses [`validate_params`] before invoking a handler and
//! [`validate_result`] before sending its response. Both turn a
//! validation failure into the [`RpcError`] the wire protocol expects,
//! with the detailed path carried in the error's data payload.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::{Schema, TypeRef};
use crate::validation::Validator;

/// JSON-RPC 2.0 error codes.
pub mod codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i64 = -32700;
    /// The request object is not a valid request.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error.
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// A JSON-RPC error object: numeric code, short message, optional data.
///
/// The serde form is the protocol's error member, with `data` omitted
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Protocol error code, usually one of [`codes`].
    pub code: i64,
    /// Short human-readable summary.
    pub message: String,
    /// Structured detail, free-form per the protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Creates an error with no data payload.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches a data payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPCError {}: {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, " (data: {})", data)?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

impl From<ValidationError> for RpcError {
    /// Maps a validation failure onto the protocol: a nonconforming
    /// value is the caller's fault (invalid params), while a schema
    /// defect discovered mid-walk is the server's (internal error).
    fn from(err: ValidationError) -> Self {
        let (code, message) = if err.is_schema_error() {
            (codes::INTERNAL_ERROR, "Internal error")
        } else {
            (codes::INVALID_PARAMS, "Invalid params")
        };
        let data = error_data(&err);
        RpcError::new(code, message).with_data(Value::Object(data))
    }
}

/// Flattens a validation error into the fields a client can act on.
fn error_data(err: &ValidationError) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("kind".to_string(), err.kind.code().into());
    data.insert("path".to_string(), err.path.to_string().into());
    data.insert("message".to_string(), err.message.clone().into());
    if let Some(expected) = &err.expected {
        data.insert("expected".to_string(), expected.clone().into());
    }
    if let Some(got) = &err.got {
        data.insert("got".to_string(), got.clone().into());
    }
    data
}

/// A positional method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    /// Parameter name, used in error detail only.
    pub name: String,
    /// Declared parameter type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

/// A method description from the contract's interface section.
///
/// ```rust
/// use bouncer::{MethodDef, TypeRef};
///
/// let method = MethodDef::new("BookService.search")
///     .param("query", TypeRef::string())
///     .returns(TypeRef::array(TypeRef::user_defined("Book")));
///
/// assert_eq!(method.parameters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Fully qualified method name.
    pub name: String,
    /// Positional parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParamDef>,
    /// Declared return type; absent for methods returning nothing.
    #[serde(default, rename = "returnType", skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
    /// Whether the return slot tolerates null.
    #[serde(default, rename = "returnOptional")]
    pub returns_optional: bool,
}

impl MethodDef {
    /// Creates a method with no parameters and no return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: None,
            returns_optional: false,
        }
    }

    /// Appends a positional parameter.
    pub fn param(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.parameters.push(ParamDef {
            name: name.into(),
            type_ref,
        });
        self
    }

    /// Declares the return type as required.
    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.returns = Some(type_ref);
        self.returns_optional = false;
        self
    }

    /// Declares the return type as nullable.
    pub fn returns_nullable(mut self, type_ref: TypeRef) -> Self {
        self.returns = Some(type_ref);
        self.returns_optional = true;
        self
    }
}

/// Checks a call's positional arguments against a method description.
///
/// Arity must match exactly, and each argument must conform to its
/// declared type; parameter slots never tolerate null. A nonconforming
/// argument maps to [`codes::INVALID_PARAMS`] with the offending
/// parameter named in the data payload; a schema defect uncovered while
/// checking maps to [`codes::INTERNAL_ERROR`].
pub fn validate_params(
    params: &[Value],
    method: &MethodDef,
    schema: &Schema,
) -> Result<(), RpcError> {
    if params.len() != method.parameters.len() {
        return Err(RpcError::new(codes::INVALID_PARAMS, "Invalid params").with_data(
            format!(
                "method '{}' expects {} parameter(s), got {}",
                method.name,
                method.parameters.len(),
                params.len()
            )
            .into(),
        ));
    }

    let validator = Validator::new(schema);
    for (position, (value, param)) in params.iter().zip(&method.parameters).enumerate() {
        if let Err(err) = validator.validate(value, &param.type_ref, false) {
            let mut rpc = RpcError::from(err);
            if let Some(Value::Object(data)) = rpc.data.as_mut() {
                data.insert("parameter".to_string(), position.into());
                data.insert("name".to_string(), param.name.clone().into());
            }
            return Err(rpc);
        }
    }
    Ok(())
}

/// Checks a handler's result against the method's declared return type.
///
/// A method without a return type accepts anything, since there is
/// nothing declared to check against. Failures use
/// [`codes::INTERNAL_ERROR`]: a bad result is produced server-side.
pub fn validate_result(result: &Value, method: &MethodDef, schema: &Schema) -> Result<(), RpcError> {
    let Some(returns) = &method.returns else {
        return Ok(());
    };

    Validator::new(schema)
        .validate(result, returns, method.returns_optional)
        .map_err(|err| {
            RpcError::new(codes::INTERNAL_ERROR, "Internal error")
                .with_data(Value::Object(error_data(&err)))
        })
}
