//! Interactive entry of search requests.

use std::io::{BufRead, Write};
use tracing::info;

use crate::config::StreamConfig;
use crate::core::{
    parse_date, SearchRequest, DEFAULT_DATE_FROM, DEFAULT_REFERENCE, DEFAULT_SEARCH_TERM,
};
use crate::errors::{NewsflowError, Result};
use crate::streams::StreamPublisher;

const TERM_PROMPT: &str = "Enter your search terms: ";
const DATE_PROMPT: &str = "Enter the date to search from (YYYY-MM-DD): ";
const REFERENCE_PROMPT: &str = "Enter a reference for this search: ";
const INVALID_DATE: &str = "Invalid date format. Please enter a date in the format YYYY-MM-DD.";

/// Asks for a search request on any reader/writer pair.
///
/// Blank answers (and end of input) take the defaults. An invalid date is
/// asked for again until a valid one or a blank line is entered.
#[derive(Debug)]
pub struct RequestPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> RequestPrompt<R, W> {
    /// Creates a prompt.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the writer, e.g. to inspect what was printed.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one search request.
    pub fn read_request(&mut self) -> Result<SearchRequest> {
        let search_term = self.ask(TERM_PROMPT, DEFAULT_SEARCH_TERM)?;

        let date_from = loop {
            let answer = self.ask(DATE_PROMPT, DEFAULT_DATE_FROM)?;
            if parse_date(&answer).is_ok() {
                break answer;
            }
            writeln!(self.output, "{INVALID_DATE}")?;
        };

        let reference = self.ask(REFERENCE_PROMPT, DEFAULT_REFERENCE)?;
        Ok(SearchRequest::new(search_term, date_from, reference))
    }

    /// Reads a request and publishes it to the input stream.
    pub async fn submit(
        &mut self,
        publisher: &dyn StreamPublisher,
        streams: &StreamConfig,
    ) -> Result<SearchRequest> {
        let request = self.read_request()?;
        writeln!(self.output, "Data to be added to the stream: {}", serde_json::json!(request))?;

        submit_request(&request, publisher, streams).await?;
        writeln!(self.output, "Data successfully written to the data stream.")?;
        Ok(request)
    }

    fn ask(&mut self, prompt: &str, default: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = match line.trim() {
            "" => default,
            answer => answer,
        };
        Ok(answer.to_string())
    }
}

/// Publishes a request as compact JSON to the configured input stream.
pub async fn submit_request(
    request: &SearchRequest,
    publisher: &dyn StreamPublisher,
    streams: &StreamConfig,
) -> Result<()> {
    let data = request.to_json_bytes()?;
    publisher
        .put_record(&streams.input_stream, &streams.partition_key, data)
        .await
        .map_err(|e| NewsflowError::stream(&streams.input_stream, e))?;
    info!(stream = %streams.input_stream, search_term = %request.search_term, "Search request published");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streams::InMemoryStreamPublisher;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prompt(input: &str) -> RequestPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        RequestPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_answers_are_trimmed() {
        let mut p = prompt("  rust async \n2024-03-01\n  weekly \n");
        let request = p.read_request().unwrap();

        assert_eq!(request, SearchRequest::new("rust async", "2024-03-01", "weekly"));
    }

    #[test]
    fn test_blank_answers_take_defaults() {
        let mut p = prompt("\n\n\n");
        let request = p.read_request().unwrap();

        assert_eq!(request, SearchRequest::new("machine learning", "2021-01-01", "guardian_content"));
    }

    #[test]
    fn test_end_of_input_takes_defaults() {
        let request = prompt("").read_request().unwrap();
        assert_eq!(request.date_from, DEFAULT_DATE_FROM);
    }

    #[test]
    fn test_invalid_date_reprompts() {
        let mut p = prompt("ai\n01/02/2024\n2024-13-01\n2024-02-01\nref\n");
        let request = p.read_request().unwrap();
        let printed = String::from_utf8(p.into_output()).unwrap();

        assert_eq!(request.date_from, "2024-02-01");
        assert_eq!(printed.matches(INVALID_DATE).count(), 2);
        assert_eq!(printed.matches(DATE_PROMPT).count(), 3);
    }

    #[tokio::test]
    async fn test_submit_publishes_json() {
        let publisher = InMemoryStreamPublisher::new();
        let streams = StreamConfig::default();
        let mut p = prompt("computers\n2999-01-01\nGuardian_content\n");

        let request = p.submit(&publisher, &streams).await.unwrap();

        let records = publisher.records_for("streaming_data_project_input");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].partition_key, "0");
        assert_eq!(SearchRequest::from_json_bytes(&records[0].data).unwrap(), request);
        assert!(String::from_utf8(p.into_output()).unwrap().contains("successfully written"));
    }

    #[tokio::test]
    async fn test_submit_failure_is_stream_error() {
        let publisher = InMemoryStreamPublisher::new();
        publisher.fail_with("stream not found");

        let err = submit_request(&SearchRequest::default(), &publisher, &StreamConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), "StreamError");
    }
}
