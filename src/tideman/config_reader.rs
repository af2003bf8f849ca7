use crate::tideman::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_juridiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
}

impl FileSource {
    /// A CSV source without header nor id column: every cell is a choice.
    pub fn csv(path: &str) -> FileSource {
        FileSource {
            provider: "csv".to_string(),
            file_path: path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
        }
    }

    /// 0-based index of the first column holding a choice (1 in the file).
    pub fn first_vote_column_index(&self) -> TidemanResult<usize> {
        match self._first_vote_column_index {
            Some(_) => Ok(read_js_int(&self._first_vote_column_index)? - 1),
            None => Ok(0),
        }
    }

    /// 0-based index of the first row holding a ballot (1 in the file).
    pub fn first_vote_row_index(&self) -> TidemanResult<usize> {
        match self._first_vote_row_index {
            Some(_) => Ok(read_js_int(&self._first_vote_row_index)? - 1),
            None => Ok(0),
        }
    }

    pub fn id_column_index_int(&self) -> TidemanResult<Option<usize>> {
        if self.id_column_index.is_some() {
            read_js_int(&self.id_column_index).map(|x| Some(x - 1))
        } else {
            Ok(None)
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionCandidate {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionRules {
    #[serde(rename = "maxCandidates")]
    pub max_candidates: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    pub candidates: Vec<ElectionCandidate>,
    #[serde(default)]
    pub rules: ElectionRules,
}

pub fn read_summary(path: String) -> TidemanResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a 1-based index. Numbers, numeric strings and Excel-style column
/// letters ("A" is 1) are accepted.
fn read_js_int(x: &Option<JSValue>) -> TidemanResult<usize> {
    let res = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add((c as usize) - ('a' as usize) + 1)
            })
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|x| *x >= 1).context(ParsingJsonNumberSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_int() {
        assert_eq!(read_js_int(&Some(json!(3))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("12"))).unwrap(), 12);
        assert_eq!(read_js_int(&Some(json!("A"))).unwrap(), 1);
        assert_eq!(read_js_int(&Some(json!("c"))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("AB"))).unwrap(), 28);
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(matches!(
            read_js_int(&Some(json!("ZZZZZZZZZZZZZZZZZZZZ"))),
            Err(TidemanError::ParsingJsonNumber {})
        ));
        assert!(read_js_int(&Some(json!(-1))).is_err());
        assert!(read_js_int(&None).is_err());
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"contestName": "Test", "contestOffice": "Mayor"},
            "cvrFileSources": [
                {"provider": "csv", "filePath": "a.csv", "firstVoteColumnIndex": "B", "idColumnIndex": 1}
            ],
            "candidates": [{"name": "A"}, {"name": "B"}]
        }"#;
        let config: ElectionConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.rules.max_candidates, None);
        assert_eq!(config.output_settings.contest_office, Some("Mayor".to_string()));
        let cfs = &config.cvr_file_sources[0];
        assert_eq!(cfs.first_vote_column_index().unwrap(), 1);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 0);
        assert_eq!(cfs.id_column_index_int().unwrap(), Some(0));
    }
}
