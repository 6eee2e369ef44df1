//! Transaction and batch construction for the Gitchain transaction family.
//!
//! - Encode logical transactions as CBOR payloads
//! - Build and sign canonical protobuf headers
//! - Assemble transactions into batches and batch lists

pub mod assembler;
pub mod encoder;
pub mod header;
pub mod protos;
pub mod signing;

pub use assembler::{assemble_batch, assemble_transaction, decode_batch_list, encode_batch_list};
pub use encoder::{decode_payload, encode_payload};
pub use header::{build_batch_header, build_transaction_header};
pub use signing::{sign_batch, sign_transaction};

/// Transaction family handled by the Gitchain transaction processor.
pub const FAMILY_NAME: &str = "gitchain";
pub const FAMILY_VERSION: &str = "0.1";
