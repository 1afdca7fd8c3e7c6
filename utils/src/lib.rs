pub mod file_util;
pub mod id_util;
