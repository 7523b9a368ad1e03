pub mod messages;
pub mod prepare_env;
