//! Wiring of repositories and gateways into the service layer.
//!
//! A [`Backend`] names one concrete implementation per port. The HTTP layer
//! is generic over it, so the same routes run against MySQL in production
//! and against the in-memory mocks in tests.

use std::sync::Arc;
use std::time::Duration;

use rv_shared::config::{JwtConfig, MatchingConfig};

use crate::errors::DomainError;
use crate::repositories::{
    EmployeeRepository, MockEmployeeRepository, MockOrganizationRepository,
    MockRetinaImageRepository, MockTokenRepository, MockUserRepository,
    MockValidationStatisticsRepository, OrganizationRepository, RetinaImageRepository,
    TokenRepository, UserRepository, ValidationStatisticsRepository,
};
use crate::services::{
    AuthService, BlobStorage, MatchingGateway, MockBlobStorage, MockMatchingGateway,
    OrganizationService, ResponseCorrelator, RetinaService, StatisticsService, TokenService,
    TokenServiceConfig, UserService, ValidationService,
};

/// Set of port implementations the application runs on
pub trait Backend: Send + Sync + 'static {
    type Users: UserRepository + 'static;
    type Tokens: TokenRepository + 'static;
    type Organizations: OrganizationRepository + 'static;
    type Employees: EmployeeRepository + 'static;
    type Retinas: RetinaImageRepository + 'static;
    type Statistics: ValidationStatisticsRepository + 'static;
    type Blobs: BlobStorage + 'static;
    type Matcher: MatchingGateway + 'static;
}

/// Instances of every port of a backend
pub struct Components<B: Backend> {
    pub users: Arc<B::Users>,
    pub tokens: Arc<B::Tokens>,
    pub organizations: Arc<B::Organizations>,
    pub employees: Arc<B::Employees>,
    pub retinas: Arc<B::Retinas>,
    pub statistics: Arc<B::Statistics>,
    pub blobs: Arc<B::Blobs>,
    pub matcher: Arc<B::Matcher>,
}

impl<B: Backend> Clone for Components<B> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            tokens: self.tokens.clone(),
            organizations: self.organizations.clone(),
            employees: self.employees.clone(),
            retinas: self.retinas.clone(),
            statistics: self.statistics.clone(),
            blobs: self.blobs.clone(),
            matcher: self.matcher.clone(),
        }
    }
}

/// Settings the services need beyond their ports
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub tokens: TokenServiceConfig,
    pub validation_timeout: Duration,
    pub instance_id: Option<String>,
}

impl ServiceSettings {
    pub fn from_config(jwt: &JwtConfig, matching: &MatchingConfig) -> Result<Self, DomainError> {
        Ok(Self {
            tokens: TokenServiceConfig::from_jwt_config(jwt)?,
            validation_timeout: Duration::from_millis(matching.validation_timeout_ms),
            instance_id: matching.instance_id.clone(),
        })
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            tokens: TokenServiceConfig::default(),
            validation_timeout: Duration::from_secs(30),
            instance_id: None,
        }
    }
}

/// Every service of the application, built over one backend
pub struct Services<B: Backend> {
    pub auth: Arc<AuthService<B::Users, B::Tokens>>,
    pub users: UserService<B::Users>,
    pub organizations: OrganizationService<B::Organizations, B::Users, B::Employees>,
    pub retinas: RetinaService<B::Retinas, B::Employees, B::Blobs, B::Matcher>,
    pub validation: ValidationService<B::Retinas, B::Blobs, B::Matcher, B::Statistics>,
    pub statistics: StatisticsService<B::Statistics>,
}

impl<B: Backend> Services<B> {
    pub fn new(components: Components<B>, settings: ServiceSettings) -> Self {
        let correlator = Arc::new(ResponseCorrelator::new(settings.validation_timeout));

        Self {
            auth: Arc::new(AuthService::new(
                components.users.clone(),
                TokenService::new(components.tokens.clone(), settings.tokens),
            )),
            users: UserService::new(components.users.clone()),
            organizations: OrganizationService::new(
                components.organizations.clone(),
                components.users.clone(),
                components.employees.clone(),
            ),
            retinas: RetinaService::new(
                components.retinas.clone(),
                components.employees.clone(),
                components.blobs.clone(),
                components.matcher.clone(),
            ),
            validation: ValidationService::new(
                components.retinas.clone(),
                components.blobs.clone(),
                components.matcher.clone(),
                components.statistics.clone(),
                correlator,
                settings.instance_id,
            ),
            statistics: StatisticsService::new(components.statistics),
        }
    }
}

/// Backend made of the in-memory mocks
pub struct MockBackend;

impl Backend for MockBackend {
    type Users = MockUserRepository;
    type Tokens = MockTokenRepository;
    type Organizations = MockOrganizationRepository;
    type Employees = MockEmployeeRepository;
    type Retinas = MockRetinaImageRepository;
    type Statistics = MockValidationStatisticsRepository;
    type Blobs = MockBlobStorage;
    type Matcher = MockMatchingGateway;
}

impl Components<MockBackend> {
    /// Fresh, empty in-memory components sharing employee state with the
    /// retina repository
    pub fn in_memory() -> Self {
        let employees = MockEmployeeRepository::new();
        Self {
            users: Arc::new(MockUserRepository::new()),
            tokens: Arc::new(MockTokenRepository::new()),
            organizations: Arc::new(MockOrganizationRepository::new()),
            retinas: Arc::new(MockRetinaImageRepository::with_employees(employees.clone())),
            employees: Arc::new(employees),
            statistics: Arc::new(MockValidationStatisticsRepository::new()),
            blobs: Arc::new(MockBlobStorage::new()),
            matcher: Arc::new(MockMatchingGateway::new()),
        }
    }
}
