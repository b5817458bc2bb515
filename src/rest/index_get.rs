// Exercise Tracker
// Copyright 2025 The exercise-tracker Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! API to serve the static landing page.

use crate::rest::EmptyBody;
use axum::response::Html;

/// Contents of the landing page, embedded at build time.
const INDEX_HTML: &str = include_str!("index.html");

/// GET handler for this API.
pub(crate) async fn handler(_body: EmptyBody) -> Html<&'static str> {
    Html(INDEX_HTML)
}
