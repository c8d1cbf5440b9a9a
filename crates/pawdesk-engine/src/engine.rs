// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reservation engine: request validation, directory resolution,
//! pricing, and dispatch into the storage transactions.
//!
//! The engine owns everything that can be decided from reads alone;
//! anything that must hold atomically against concurrent writes happens
//! inside `pawdesk_storage::booking`. A failed validation or lookup here
//! therefore never leaves partial state behind.

use chrono::NaiveDate;
use pawdesk_core::PawdeskError;
use pawdesk_core::pricing::{BoardingTier, billed_nights, select_tier};
use pawdesk_core::types::{
    Reservation, ReservationDetail, ReservationId, ReservationKind, ReservationSnapshot,
    TransitionAction,
};
use pawdesk_storage::models::{
    CouponPoolStats, CreatedReservation, CustomerRecord, NewReservation, PetRecord,
    RiskReservation, StoreRecord, TransitionOutcome,
};
use pawdesk_storage::{Database, booking, queries};

use crate::requests::{BoardingRequest, CreateReservationRequest, GroomingRequest, ListStatus};
use crate::views::{BoardingAvailability, GroomingAvailability, ReservationDetails};

/// How many previous visits the detail page's history panel shows.
const HISTORY_PANEL_LIMIT: i64 = 20;

/// Stateless orchestration over the shared database handle.
#[derive(Clone)]
pub struct Engine {
    db: Database,
}

impl Engine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle, for callers that need raw queries.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Validate, price, and book a reservation of either kind.
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<CreatedReservation, PawdeskError> {
        match request {
            CreateReservationRequest::Grooming(req) => self.create_grooming(req).await,
            CreateReservationRequest::Boarding(req) => self.create_boarding(req).await,
        }
    }

    async fn create_grooming(
        &self,
        req: GroomingRequest,
    ) -> Result<CreatedReservation, PawdeskError> {
        if req.services.is_empty() {
            return Err(PawdeskError::validation("services must not be empty"));
        }

        let (store, customer, pet) = self
            .resolve_directory(&req.store_name, &req.user_id, &req.pet_name)
            .await?;

        let prices = queries::pricing::grooming_prices(
            &self.db,
            &store.store_name,
            req.services.clone(),
            &pet.size,
            &pet.fur_amount,
        )
        .await?;

        let mut total_price = 0;
        let mut grooming_period = 0;
        for (service, price) in req.services.iter().zip(&prices) {
            let Some(price) = price else {
                return Err(PawdeskError::not_found(
                    "grooming pricing",
                    format!(
                        "{service} for {}/{} at {}",
                        pet.size, pet.fur_amount, store.store_name
                    ),
                ));
            };
            total_price += price.price;
            grooming_period += price.duration_minutes;
        }
        if grooming_period <= 0 {
            return Err(PawdeskError::validation(
                "booked services have no positive duration",
            ));
        }
        tracing::debug!(total_price, grooming_period, "grooming request priced");

        let coupon_user = req.use_coupon.then(|| req.user_id.clone());
        let new = NewReservation {
            snapshot: snapshot_of(store, customer, pet),
            pick_up_service: req.pick_up_service,
            customer_note: req.customer_note,
            total_price,
            detail: ReservationDetail::Grooming {
                services: req.services,
                reservation_time: req.reservation_time,
                grooming_period,
            },
            coupon_user,
        };
        booking::create(&self.db, new).await
    }

    async fn create_boarding(
        &self,
        req: BoardingRequest,
    ) -> Result<CreatedReservation, PawdeskError> {
        if req.checkout_at <= req.checkin_at {
            return Err(PawdeskError::validation("checkout must be after checkin"));
        }

        let (store, customer, pet) = self
            .resolve_directory(&req.store_name, &req.user_id, &req.pet_name)
            .await?;

        let Some((_room, tier_rows)) =
            queries::pricing::boarding_catalog(&self.db, &store.store_name, &req.room_type).await?
        else {
            return Err(PawdeskError::not_found(
                "room type",
                format!("{} at {}", req.room_type, store.store_name),
            ));
        };
        let tiers: Vec<BoardingTier> = tier_rows.iter().map(|row| row.tier()).collect();

        let nights = billed_nights(req.checkin_at, req.checkout_at);
        let Some(tier) = select_tier(&tiers, nights) else {
            return Err(PawdeskError::not_found(
                "boarding pricing",
                format!("{} at {}", req.room_type, store.store_name),
            ));
        };
        let total_price = nights * tier.price_per_day;
        tracing::debug!(nights, total_price, "boarding request priced");

        let new = NewReservation {
            snapshot: snapshot_of(store, customer, pet),
            pick_up_service: req.pick_up_service,
            customer_note: req.customer_note,
            total_price,
            detail: ReservationDetail::Boarding {
                room_type: req.room_type,
                checkin_at: req.checkin_at,
                checkout_at: req.checkout_at,
            },
            coupon_user: None,
        };
        booking::create(&self.db, new).await
    }

    /// Apply a lifecycle action. `store_note` rides along on confirmation.
    pub async fn transition(
        &self,
        reservation_id: &str,
        action: TransitionAction,
        store_note: Option<String>,
    ) -> Result<TransitionOutcome, PawdeskError> {
        let id = ReservationId::from(reservation_id.to_string());
        booking::transition(&self.db, &id, action, store_note).await
    }

    /// One reservation with its order and the customer's history at the
    /// same store.
    pub async fn reservation_details(
        &self,
        reservation_id: &str,
    ) -> Result<ReservationDetails, PawdeskError> {
        let id = ReservationId::from(reservation_id.to_string());
        let reservation = queries::reservations::get(&self.db, &id)
            .await?
            .ok_or_else(|| PawdeskError::not_found("reservation", reservation_id.to_string()))?;
        let order = queries::orders::find_for_reservation(&self.db, &id).await?;
        let customer_history = queries::reservations::finished_history_for_identity(
            &self.db,
            &reservation.snapshot.store_name,
            &reservation.snapshot.user_name,
            &reservation.snapshot.user_phone,
            &id,
            HISTORY_PANEL_LIMIT,
        )
        .await?;
        Ok(ReservationDetails {
            reservation,
            order,
            customer_history,
        })
    }

    /// Occupied grooming markers at a store for one day.
    pub async fn grooming_availability(
        &self,
        store_name: &str,
        date: NaiveDate,
    ) -> Result<GroomingAvailability, PawdeskError> {
        self.require_store(store_name).await?;
        let occupied = queries::slots::occupied_grooming_times(&self.db, store_name, date).await?;
        Ok(GroomingAvailability {
            store_name: store_name.to_string(),
            date,
            occupied,
        })
    }

    /// Boarding occupancy per room type at a store for one day.
    pub async fn boarding_availability(
        &self,
        store_name: &str,
        date: NaiveDate,
    ) -> Result<BoardingAvailability, PawdeskError> {
        self.require_store(store_name).await?;
        let rooms = queries::slots::boarding_occupancy(&self.db, store_name, date).await?;
        Ok(BoardingAvailability {
            store_name: store_name.to_string(),
            date,
            rooms,
        })
    }

    /// Staff listing for a store: pending queue, confirmed schedule, or
    /// settled history.
    pub async fn list_reservations(
        &self,
        store_name: &str,
        status: ListStatus,
        kind: Option<ReservationKind>,
        limit: i64,
    ) -> Result<Vec<Reservation>, PawdeskError> {
        match status {
            ListStatus::Pending => {
                queries::reservations::list_pending(&self.db, store_name, kind, limit).await
            }
            ListStatus::Confirmed => {
                queries::reservations::list_confirmed(&self.db, store_name, kind, limit).await
            }
            ListStatus::History => {
                queries::reservations::list_history(&self.db, store_name, kind, limit).await
            }
        }
    }

    /// Completed reservations joined with their orders and risk flags.
    pub async fn risk_reservations(
        &self,
        store_name: &str,
        limit: i64,
    ) -> Result<Vec<RiskReservation>, PawdeskError> {
        queries::orders::risk_list(&self.db, store_name, limit).await
    }

    /// Flip the risk flag on an order.
    pub async fn set_order_blacklist(
        &self,
        order_id: i64,
        flag: bool,
    ) -> Result<(), PawdeskError> {
        queries::orders::set_blacklist(&self.db, order_id, flag).await
    }

    /// Replace the staff note on a reservation without touching its state.
    pub async fn update_store_note(
        &self,
        reservation_id: &str,
        note: &str,
    ) -> Result<(), PawdeskError> {
        let id = ReservationId::from(reservation_id.to_string());
        queries::reservations::update_store_note(&self.db, &id, note).await
    }

    /// Promotional coupon pool consumption.
    pub async fn coupon_pool(&self) -> Result<CouponPoolStats, PawdeskError> {
        queries::coupons::pool_stats(&self.db).await
    }

    async fn resolve_directory(
        &self,
        store_name: &str,
        user_id: &str,
        pet_name: &str,
    ) -> Result<(StoreRecord, CustomerRecord, PetRecord), PawdeskError> {
        let store = queries::directory::find_store(&self.db, store_name)
            .await?
            .ok_or_else(|| PawdeskError::not_found("store", store_name.to_string()))?;
        let customer = queries::directory::find_customer(&self.db, user_id)
            .await?
            .ok_or_else(|| PawdeskError::not_found("customer", format!("user_id={user_id}")))?;
        let pet = queries::directory::find_pet(&self.db, user_id, pet_name)
            .await?
            .ok_or_else(|| {
                PawdeskError::not_found("pet", format!("{pet_name} under user_id={user_id}"))
            })?;
        Ok((store, customer, pet))
    }

    async fn require_store(&self, store_name: &str) -> Result<(), PawdeskError> {
        queries::directory::find_store(&self.db, store_name)
            .await?
            .ok_or_else(|| PawdeskError::not_found("store", store_name.to_string()))?;
        Ok(())
    }
}

fn snapshot_of(
    store: StoreRecord,
    customer: CustomerRecord,
    pet: PetRecord,
) -> ReservationSnapshot {
    ReservationSnapshot {
        store_name: store.store_name,
        user_name: customer.full_name,
        user_phone: customer.phone,
        pet_name: pet.pet_name,
        pet_species: pet.species,
        pet_breed: pet.breed,
        pet_size: pet.size,
    }
}
