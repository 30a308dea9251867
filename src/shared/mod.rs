pub mod model;
pub mod test_helpers;
