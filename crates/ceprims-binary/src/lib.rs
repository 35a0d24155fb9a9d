//! Binary-mode event mapping.
//!
//! Context attributes and extensions travel as individual `ce_`-prefixed
//! transport headers; the payload is the transport body, untouched:
//! - `ce_id`, `ce_source`, `ce_specversion`, `ce_type` (required)
//! - `ce_subject`, `ce_time`, `ce_dataschema` (when present)
//! - `ce_<extension>` per extension
//! - `content-type` carries `datacontenttype`
//!
//! Header values are UTF-8 text, so extension kinds are recovered with a
//! fixed grammar (see [`infer_extension_value`]).

pub mod codec;
pub mod headers;

pub use codec::{decode, encode, infer_extension_value, BinaryMessage};
pub use headers::{Headers, CE_HEADER_PREFIX, CONTENT_TYPE_HEADER};
