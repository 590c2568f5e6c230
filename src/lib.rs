//! mgsetup - Idempotent installer for the MG modem monitoring agent.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── install       # Full provisioning run
//! │   ├── secrets       # Resolve keys, write the environment file
//! │   ├── schedule      # Rewrite the managed schedule block
//! │   ├── status        # Read-only overview
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── prompt/       # Environment lookup and terminal prompting
//!     ├── encode        # KEY="VALUE" escaping
//!     ├── table         # Atomically replaced text files
//!     ├── envfile       # Environment file merge and persist
//!     ├── schedule/     # Managed block parser and schedule backends
//!     ├── system/       # External commands and install steps
//!     ├── cleanup       # Workspace and terminal cleanup on signals
//!     ├── config        # /etc/mgsetup.toml settings
//!     └── provision     # The full run
//! ```
//!
//! Every step can be repeated: rerunning with the same inputs leaves the
//! environment file and the schedule byte-identical, and never disturbs
//! lines the installer does not own.

pub mod cli;
pub mod core;
pub mod error;
