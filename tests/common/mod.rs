#![allow(dead_code)]

pub use cpmflow_test_utils::builders;
pub use cpmflow_test_utils::flaky_store;
pub use cpmflow_test_utils::{init_tracing, with_timeout};
