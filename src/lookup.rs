use tracing::debug;

use crate::error::{Result, ScraperError};
use crate::models::{CourseCode, CourseRecord};
use crate::session::CatalogSession;

/// Subject drop-down of the search form.
pub const SUBJECT_SELECT: &str = "#MainContent_ddlSubjectCode";
/// Free-text course number field.
pub const COURSE_NUMBER_INPUT: &str = "#MainContent_txtCourseNumber";
pub const SUBMIT_BUTTON: &str = "#MainContent_btnSubmit";
/// Detail blocks of the first search result: semesters, credits, requisites.
pub const DETAIL_BLOCKS: &str =
    "div#MainContent_rptrSearchResults_divMainDetails_0 > div > div.col-md-7";

/// Runs one search for `code` and returns the raw semesters, credits and
/// requisites texts of the first result, in that order.
///
/// Fails if the subject is not offered by the form or the result has fewer
/// than three detail blocks. Nothing is retried.
pub async fn fetch_course_details<S>(
    session: &mut S,
    search_url: &str,
    code: &CourseCode,
) -> Result<[String; 3]>
where
    S: CatalogSession + ?Sized,
{
    // --- STEP 1: Fresh search form ---
    session.navigate(search_url).await?;

    // --- STEP 2: Fill in subject and number, then submit ---
    session.select_option(SUBJECT_SELECT, &code.subject).await?;
    session.type_text(COURSE_NUMBER_INPUT, &code.number).await?;
    session.submit(SUBMIT_BUTTON).await?;

    // --- STEP 3: Read the first result block ---
    let blocks = session.texts(DETAIL_BLOCKS).await?;
    debug!(course = %code, blocks = blocks.len(), "search result read");

    let found = blocks.len();
    let mut blocks = blocks.into_iter();
    match (blocks.next(), blocks.next(), blocks.next()) {
        (Some(semesters), Some(credits), Some(requisites)) => Ok([semesters, credits, requisites]),
        _ => Err(ScraperError::TooFewBlocks { found }),
    }
}

/// Looks up `code` and parses the result into a record.
pub async fn lookup_course<S>(
    session: &mut S,
    search_url: &str,
    code: &CourseCode,
) -> Result<CourseRecord>
where
    S: CatalogSession + ?Sized,
{
    let blocks = fetch_course_details(session, search_url, code).await?;
    CourseRecord::from_raw(code, &blocks)
}
