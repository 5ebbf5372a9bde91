use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error(transparent)]
    IO(#[from] std::io::Error),

    // --------------------------------- source errors ---------------------------------------------
    #[error("source file {0:?} not found")]
    SourceNotFound(PathBuf),
    #[error("parse source file {file}: {reason}")]
    SourceParsing { file: String, reason: String },

    // --------------------------------- disasm ----------------------------------------------------
    #[error("install disassembler: {0}")]
    DisAsmInit(capstone::Error),
    #[error("instructions disassembly error: {0}")]
    DisAsm(capstone::Error),
    #[error("address range {0:#x}..{1:#x} is out of code image")]
    OutOfImage(u64, u64),
    #[error("no instructions for {0}:{1}")]
    NoInstructions(String, u64),

    // --------------------------------- configuration ---------------------------------------------
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Return a hint to an interface - continue work after error or stop whole process.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::IO(_) => false,
            Error::SourceNotFound(_) => false,
            Error::SourceParsing { .. } => false,
            Error::DisAsm(_) => false,
            Error::OutOfImage(_, _) => false,
            Error::NoInstructions(_, _) => false,
            Error::Config(_) => false,

            // currently fatal errors
            Error::DisAsmInit(_) => true,
        }
    }
}

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "step-into", "{:#}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "step-into", concat!($msg, " {:#}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}

/// Transforms `Result` into `Option` and put error into debug logs if it occurs.
#[macro_export]
macro_rules! muted_error {
    ($res: expr) => {
        $crate::_error!(log::debug, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::debug, $res, $msg)
    };
}
