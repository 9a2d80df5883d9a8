pub mod constants;
pub mod version;

pub type CmdResult<T> = upkeep::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}
