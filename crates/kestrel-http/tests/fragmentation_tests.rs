//! Property tests: the response does not depend on how it was fragmented.

use kestrel_http::{ResponseParser, ResponseRecord};
use quickcheck_macros::quickcheck;

const CHUNKED: &[u8] = b"HTTP/1.1 200 OK\r\n\
Server: kestrel-test\r\n\
Transfer-Encoding: chunked\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
1a\r\n<html><body><p>Hello</p>\r\n\r\n\
c\r\n</body></htm\r\n\
1\r\nl\r\n\
0\r\n\r\n";

const UNCHUNKED: &[u8] = b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nX-Empty:\r\n\r\nno such page\r\n";

/// Feed `bytes` split at offsets derived from `cuts`, then close.
fn parse_fragmented(bytes: &[u8], cuts: &[usize]) -> ResponseRecord {
    let mut offsets: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    offsets.push(0);
    offsets.push(bytes.len());
    offsets.sort_unstable();
    offsets.dedup();

    let mut parser = ResponseParser::new();
    for window in offsets.windows(2) {
        parser.feed(&bytes[window[0]..window[1]]).unwrap();
    }
    parser.finish();
    parser.result().unwrap()
}

#[quickcheck]
fn prop_chunked_response_independent_of_fragmentation(cuts: Vec<usize>) -> bool {
    parse_fragmented(CHUNKED, &cuts) == parse_fragmented(CHUNKED, &[])
}

#[quickcheck]
fn prop_unchunked_response_independent_of_fragmentation(cuts: Vec<usize>) -> bool {
    parse_fragmented(UNCHUNKED, &cuts) == parse_fragmented(UNCHUNKED, &[])
}

#[test]
fn test_fragmented_chunked_body() {
    let record = parse_fragmented(CHUNKED, &[3, 17, 50, 90]);
    assert_eq!(record.body_text(), "<html><body><p>Hello</p>\r\n</body></html");
    assert_eq!(record.headers.get("Content-Type"), Some("text/html; charset=utf-8"));
}
