pub(crate) mod utils;

mod languages;
