//! Home Route
//!
//! - GET / - HTML listing of the available API routes

use axum::response::Html;

const INDEX_HTML: &str = r#"<html>
<head><title>Climate API</title></head>
<body>
<h1>Available Honolulu climate API routes</h1>
<ul>
  <li>
    Precipitation for the last year of data:<br>
    <a href="/api/v1.0/precipitation">/api/v1.0/precipitation</a>
  </li>
  <li>
    Stations with observations:<br>
    <a href="/api/v1.0/stations">/api/v1.0/stations</a>
  </li>
  <li>
    Temperature observations for the last year of data:<br>
    <a href="/api/v1.0/tobs">/api/v1.0/tobs</a>
  </li>
  <li>
    Min, max and average temperature from a start date on:<br>
    <a href="/api/v1.0/2017-01-01">/api/v1.0/2017-01-01</a>
  </li>
  <li>
    Min, max and average temperature between two dates (inclusive):<br>
    <a href="/api/v1.0/2017-01-01/2017-01-07">/api/v1.0/2017-01-01/2017-01-07</a>
  </li>
</ul>
<p>Add <code>?by_station=true</code> to the precipitation and temperature
lists to get every station's reading per date.</p>
</body>
</html>
"#;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
