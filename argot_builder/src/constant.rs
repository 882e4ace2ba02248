pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: &str = "h";
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";

// Internal name marker for sub-command rules; it carries a reserved character, so no declared name can collide with it.
pub(crate) const SUB_COMMAND_PREFIX: &str = "!cmd-";

pub(crate) const CLI_SOURCE: &str = "cli-args";
pub(crate) const ENV_SOURCE: &str = "cli-env";
pub(crate) const DEFAULT_SOURCE: &str = "cli-default";
pub(crate) const MEMORY_SOURCE: &str = "memory-store";

pub(crate) const ERROR_CODE: i32 = 1;
pub(crate) const HELP_CODE: i32 = 0;

pub(crate) const RESERVED_CHARACTERS: &[char] = &[
    '!', '"', '#', '$', '&', '\'', '/', '(', ')', '*', ';', '<', '>', '{', '|', '}', '\\', '~',
];
