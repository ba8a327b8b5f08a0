mod common;
mod metrics;
