// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::aggregator::AddressInfoService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AddressInfoService>,
}

impl AppState {
    pub fn new(service: Arc<AddressInfoService>) -> Self {
        Self { service }
    }
}
