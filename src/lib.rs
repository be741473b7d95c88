#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use op_reflect as reflect;
pub use op_utils as utils;
pub use op_value as value;
