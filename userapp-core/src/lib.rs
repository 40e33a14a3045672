//! Core data model of the UserApp API client: request parameter trees and
//! the dynamic result navigator. Nothing in this crate performs I/O.

pub mod error;
pub mod params;
pub mod result;

pub use error::{CoercionError, ErrorCode, ParamError};
pub use params::{ParamArray, ParamStruct, ParamValue, Parameter};
pub use result::{Key, ResultNavigator};
