//! End-to-end search flows against a mocked OMDb server.

use cinefind_core::{CinefindConfig, MemoryMovieStore, MovieStore, UNKNOWN};
use cinefind_search::{MovieSearchService, SearchStrategy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> MovieSearchService {
    MovieSearchService::new(&CinefindConfig::for_testing(server.uri())).unwrap()
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Response": "False",
        "Error": "Movie not found!"
    }))
}

fn search_hit(items: serde_json::Value, total: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Search": items,
        "totalResults": total,
        "Response": "True"
    }))
}

fn detail(imdb_id: &str, title: &str, year: &str, actors: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Title": title,
        "Year": year,
        "Rated": "R",
        "Released": "24 Mar 1972",
        "Runtime": "175 min",
        "Genre": "Crime, Drama",
        "Director": "Francis Ford Coppola",
        "Writer": "Mario Puzo, Francis Ford Coppola",
        "Actors": actors,
        "Plot": "The aging patriarch of an organized crime dynasty transfers control.",
        "Poster": "https://example.com/godfather.jpg",
        "imdbRating": "9.2",
        "imdbID": imdb_id,
        "Type": "movie",
        "Response": "True"
    }))
}

async fn mount_search(server: &MockServer, term: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", term))
        .and(query_param("apikey", "test-key"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_misspelled_title_recovered_by_prefix_phase() {
    let server = MockServer::start().await;
    mount_search(&server, "godfther", not_found(), 1).await;
    mount_search(&server, "godfther*", not_found(), 1).await;
    mount_search(
        &server,
        "the godfther",
        search_hit(
            json!([{"Title": "The Godfather", "Year": "1972", "imdbID": "tt0068646", "Type": "movie"}]),
            "1",
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0068646"))
        .respond_with(detail("tt0068646", "The Godfather", "1972", "Marlon Brando, Al Pacino"))
        .expect(1)
        .mount(&server)
        .await;

    let report = service_for(&server).search_with_fallback("godfther").await;

    assert_eq!(report.error_message, "");
    assert_eq!(report.results.len(), 1);
    let godfather = &report.results[0];
    assert_eq!(godfather.title, "The Godfather");
    assert_eq!(godfather.imdb_rating, "9.2");
    assert!(godfather.has_cast_member("pacino"));
    assert_eq!(
        report.attempts,
        vec![
            SearchStrategy::Direct,
            SearchStrategy::Wildcard,
            SearchStrategy::Prefix("the ")
        ]
    );
}

#[tokio::test]
async fn test_paginated_search_enriches_each_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "alien"))
        .and(query_param("page", "1"))
        .respond_with(search_hit(
            json!([
                {"Title": "Alien", "Year": "1979", "imdbID": "tt0078748"},
                {"Title": "Aliens", "Year": "1986", "imdbID": "tt0090605"}
            ]),
            "12",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("s", "alien"))
        .and(query_param("page", "2"))
        .respond_with(search_hit(
            json!([{"Title": "Alien 3", "Year": "1992", "imdbID": "tt0103644"}]),
            "12",
        ))
        .mount(&server)
        .await;
    for (id, title) in [
        ("tt0078748", "Alien"),
        ("tt0090605", "Aliens"),
        ("tt0103644", "Alien 3"),
    ] {
        Mock::given(method("GET"))
            .and(query_param("i", id))
            .respond_with(detail(id, title, "1979", "Sigourney Weaver"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let service = service_for(&server);
    let first = service.new_search("alien").await.unwrap();
    let second = service.load_more().await.unwrap();

    assert_eq!(first.total_results, 12);
    assert_eq!(first.items.len(), 2);
    assert_eq!(second.items[0].title, "Alien 3");

    let session = service.session().await.unwrap();
    let titles: Vec<_> = session.items().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Aliens", "Alien 3"]);
}

#[tokio::test]
async fn test_server_errors_read_as_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service.search_with_fallback("heat").await;
    let page = service.new_search("heat").await.unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.error_message, "No movies found matching: heat");
    assert!(page.items.is_empty());
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn test_malformed_body_is_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let page = service_for(&server).new_search("heat").await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn test_failed_detail_yields_sentinel_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "heat"))
        .respond_with(search_hit(
            json!([
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277"},
                {"Title": "The Heat", "Year": "2013", "imdbID": "tt2404463"}
            ]),
            "2",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0113277"))
        .respond_with(detail("tt0113277", "Heat", "1995", "Al Pacino, Robert De Niro"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt2404463"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = service_for(&server).search_with_fallback("heat").await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].title, "Heat");
    assert_eq!(report.results[1].imdb_id, "tt2404463");
    assert_eq!(report.results[1].title, UNKNOWN);
}

#[tokio::test]
async fn test_selected_movie_saved_and_found_by_actor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0068646"))
        .respond_with(detail("tt0068646", "The Godfather", "1972", "Marlon Brando, Al Pacino"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let store = MemoryMovieStore::new();
    service.save_movie("tt0068646", &store).await.unwrap();

    let by_actor = store.find_by_actor("brando").await.unwrap();
    assert_eq!(by_actor.len(), 1);
    assert_eq!(by_actor[0].record.title, "The Godfather");
}
