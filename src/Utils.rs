/// Reading lists of equations from text files
pub mod load_from_file;
/// simplelog setup from the balancer settings
pub mod logger;
