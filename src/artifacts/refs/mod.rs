pub mod ref_name;

/// Names git refuses for refs: leading dot or slash, `..`, `/.`, trailing
/// slash, `.lock` suffix, `@{`, control characters and glob/revision syntax
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
