//! In-memory test doubles for the repository and event seams.

mod mock_call_log_repository;
mod mock_contact_repository;
mod mock_deal_repository;
mod mock_event_publisher;
mod mock_holiday_repository;
mod mock_lead_repository;
mod mock_permission_checker;

#[allow(unused_imports)]
pub use mock_call_log_repository::MockCallLogRepository;
#[allow(unused_imports)]
pub use mock_contact_repository::MockContactRepository;
#[allow(unused_imports)]
pub use mock_deal_repository::MockDealRepository;
#[allow(unused_imports)]
pub use mock_event_publisher::RecordingPublisher;
#[allow(unused_imports)]
pub use mock_holiday_repository::MockHolidayRepository;
#[allow(unused_imports)]
pub use mock_lead_repository::MockLeadRepository;
#[allow(unused_imports)]
pub use mock_permission_checker::MockPermissionChecker;
