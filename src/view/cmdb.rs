//! State of the CMDB screens: the category tiles and one category's asset table.

use crate::{
    config::settings::ViewSettings,
    core::asset::{CategoryCount, assets_in_category, count_by_category},
    entities::{AssetCategory, AssetModel, AssetStatus},
    view::{
        filter::{SearchMode, SearchQuery, StatusFilter},
        paginator::{Page, Paginator},
    },
};

/// Category tiles for the CMDB landing screen, recomputed on every call.
#[must_use]
pub fn category_tiles(assets: &[AssetModel]) -> Vec<CategoryCount> {
    count_by_category(assets)
}

/// Asset table of a single category with status filter, search and paging.
#[derive(Clone, Debug)]
pub struct AssetTableView {
    category: AssetCategory,
    status: StatusFilter<AssetStatus>,
    search_text: String,
    search_mode: SearchMode,
    paginator: Paginator,
}

impl AssetTableView {
    /// Table for `category`, showing every status on page 1.
    #[must_use]
    pub fn new(category: AssetCategory, settings: &ViewSettings) -> Self {
        Self {
            category,
            status: StatusFilter::All,
            search_text: String::new(),
            search_mode: settings.search_mode,
            paginator: Paginator::new(settings.asset_page_size),
        }
    }

    /// Category this table lists.
    #[must_use]
    pub const fn category(&self) -> AssetCategory {
        self.category
    }

    /// Changes the status filter and goes back to page 1.
    pub fn set_status_filter(&mut self, status: StatusFilter<AssetStatus>) {
        self.status = status;
        self.paginator.reset();
    }

    /// Changes the search text and goes back to page 1.
    pub fn set_search(&mut self, text: &str) {
        text.clone_into(&mut self.search_text);
        self.paginator.reset();
    }

    fn matching<'a>(&self, assets: &'a [AssetModel]) -> Vec<&'a AssetModel> {
        let query = SearchQuery::new(&self.search_text, self.search_mode);
        assets_in_category(assets, self.category)
            .into_iter()
            .filter(|asset| self.status.matches(&asset.status()) && query.matches(*asset))
            .collect()
    }

    /// The page of matching assets currently on screen.
    #[must_use]
    pub fn visible<'a>(&self, assets: &'a [AssetModel]) -> Page<&'a AssetModel> {
        self.paginator.paginate(self.matching(assets))
    }

    /// Next page; no-op on the last one.
    pub fn next_page(&mut self, assets: &[AssetModel]) -> bool {
        let total = self.matching(assets).len();
        self.paginator.next(total)
    }

    /// Previous page; no-op on the first one.
    pub fn previous_page(&mut self, assets: &[AssetModel]) -> bool {
        let total = self.matching(assets).len();
        self.paginator.previous(total)
    }
}
