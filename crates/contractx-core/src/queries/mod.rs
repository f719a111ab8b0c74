//! Read-side helpers: sorting, paging and reminder listings

pub mod contract_sort;
pub mod paging;
pub mod reminders;

pub use contract_sort::ContractSortField;
pub use paging::{paginate, sort_and_page, PageRequest, PagedList, SortBy, SortDirection};
pub use reminders::{
    reminder_cutoff, BaseUrlUriBuilder, ContractReminderItem, ContractReminders, PagingMetadata,
    UriBuilder, PAGE_NUMBER_PLACEHOLDER,
};
