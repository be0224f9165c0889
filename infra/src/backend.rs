//! Production backend: MySQL repositories, filesystem blobs and the HTTP
//! matching gateway.

use std::sync::Arc;

use rv_core::{Backend, Components};
use rv_shared::config::AppConfig;

use crate::database::{
    DatabasePool, MySqlEmployeeRepository, MySqlOrganizationRepository,
    MySqlRetinaImageRepository, MySqlTokenRepository, MySqlUserRepository,
    MySqlValidationStatisticsRepository,
};
use crate::matching::HttpMatchingGateway;
use crate::storage::LocalBlobStorage;
use crate::InfrastructureError;

/// Backend used by the deployed server
pub struct MySqlBackend;

impl Backend for MySqlBackend {
    type Users = MySqlUserRepository;
    type Tokens = MySqlTokenRepository;
    type Organizations = MySqlOrganizationRepository;
    type Employees = MySqlEmployeeRepository;
    type Retinas = MySqlRetinaImageRepository;
    type Statistics = MySqlValidationStatisticsRepository;
    type Blobs = LocalBlobStorage;
    type Matcher = HttpMatchingGateway;
}

impl MySqlBackend {
    /// Build every component over an open pool
    pub fn components(
        pool: &DatabasePool,
        config: &AppConfig,
    ) -> Result<Components<Self>, InfrastructureError> {
        let db = pool.get_pool().clone();

        Ok(Components {
            users: Arc::new(MySqlUserRepository::new(db.clone())),
            tokens: Arc::new(MySqlTokenRepository::new(db.clone())),
            organizations: Arc::new(MySqlOrganizationRepository::new(db.clone())),
            employees: Arc::new(MySqlEmployeeRepository::new(db.clone())),
            retinas: Arc::new(MySqlRetinaImageRepository::new(db.clone())),
            statistics: Arc::new(MySqlValidationStatisticsRepository::new(db)),
            blobs: Arc::new(LocalBlobStorage::from_config(&config.storage)),
            matcher: Arc::new(HttpMatchingGateway::new(&config.matching)?),
        })
    }
}
