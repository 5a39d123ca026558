use super::test_helpers::*;
use super::*;
use crate::config::Config;
use crate::types::Event;
use crate::error::messages;
use crate::host::memory::ViewCall;
use crate::host::Button;

mod fetch;
