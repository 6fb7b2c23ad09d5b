//! Typed repositories over the document store.
//!
//! Repositories own the collection names and document shapes; everything
//! above them works with `loanmitra_core` types. All repositories are
//! generic over `Arc<dyn DocumentStore>` so the test suites can substitute
//! in-memory, counting or failing stores.

pub mod agents;
pub mod branches;
pub mod leads;
pub mod registry;

pub use agents::AgentRepository;
pub use branches::BranchRepository;
pub use leads::LeadRepository;
pub use registry::{RegistryEntry, RegistryRepository};
