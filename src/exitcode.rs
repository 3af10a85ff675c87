//! Process exit codes, following BSD `sysexits.h`.

/// Bad flag or missing subcommand
pub const USAGE: i32 = 64;

/// Inventory, boundary or projection present but unusable
pub const DATAERR: i32 = 65;

/// Inventory workbook or boundary shapefile not found
pub const NOINPUT: i32 = 66;

/// Failure outside the input data (serialization, directory listing)
pub const SOFTWARE: i32 = 70;

/// Map document could not be written
pub const CANTCREAT: i32 = 73;

/// Working directory could not be resolved
pub const IOERR: i32 = 74;

/// Unreadable or invalid settings file
pub const CONFIG: i32 = 78;
