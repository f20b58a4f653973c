//! The entity mutation core and its collaborators

use graphgate_core::clock::{Clock, SystemClock};
use graphgate_core::config::{GatewayConfig, PaginationConfig};
use graphgate_core::graph::GraphClient;
use graphgate_core::ids::{IdGenerator, TimestampIdGenerator};
use graphgate_core::logging_facility;
use graphgate_core::model::{CreatePostInput, CreateUserInput, UpdatePostInput, UpdateUserInput};
use graphgate_core::validation::{SchemaValidator, Validator};
use std::sync::Arc;

/// Payload validators, one per mutation that takes a payload
#[derive(Clone)]
pub struct Validators {
    pub create_user: Arc<dyn Validator<CreateUserInput>>,
    pub update_user: Arc<dyn Validator<UpdateUserInput>>,
    pub create_post: Arc<dyn Validator<CreatePostInput>>,
    pub update_post: Arc<dyn Validator<UpdatePostInput>>,
}

impl Default for Validators {
    fn default() -> Self {
        Self {
            create_user: Arc::new(SchemaValidator),
            update_user: Arc::new(SchemaValidator),
            create_post: Arc::new(SchemaValidator),
            update_post: Arc::new(SchemaValidator),
        }
    }
}

/// Orchestrates validate → pre-check → write → shape for every operation
///
/// Holds no mutable state of its own; concurrent invocations share only the
/// store client.
///
/// ```
/// use graphgate_engine::MutationCore;
/// use graphgate_store::MemoryGraph;
/// use std::sync::Arc;
///
/// let core = MutationCore::new(Arc::new(MemoryGraph::new()));
/// assert_eq!(core.max_page_size(), 100);
/// ```
#[derive(Clone)]
pub struct MutationCore {
    pub(crate) client: Arc<dyn GraphClient>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) validators: Validators,
    pub(crate) pagination: PaginationConfig,
}

impl MutationCore {
    /// System clock, timestamp ids, schema validators, default paging
    pub fn new(client: Arc<dyn GraphClient>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            client,
            ids: Arc::new(TimestampIdGenerator::new(clock.clone())),
            clock,
            validators: Validators::default(),
            pagination: PaginationConfig::default(),
        }
    }

    /// Install the configured logging profile and apply its paging limits
    ///
    /// Logging is initialized once per process; later calls keep the
    /// first profile.
    pub fn from_config(client: Arc<dyn GraphClient>, config: &GatewayConfig) -> Self {
        logging_facility::init(config.logging.profile);
        Self::new(client).with_pagination(config.pagination)
    }

    /// Use `clock` for timestamps and for the id prefix
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = Arc::new(TimestampIdGenerator::new(clock.clone()));
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_validators(mut self, validators: Validators) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn max_page_size(&self) -> u32 {
        self.pagination.max_page_size
    }

    pub fn default_page_size(&self) -> u32 {
        self.pagination.default_page_size
    }
}
