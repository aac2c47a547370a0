//! Data model shared by every pipeline stage

pub mod types;

pub use types::{
    parse_field_list, EffectiveParameters, HeadersDict, InvocationOverrides, OutputMode,
    ResponseBody, ResponseEnvelope,
};
