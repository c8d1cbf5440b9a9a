// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two write transactions of the booking engine.
//!
//! Creation claims slot markers and inserts the reservation row in one
//! transaction; completion flips the status, writes the order, and consumes
//! the coupon in one transaction. Together with the single writer thread
//! this closes the check-then-claim race: no other write can interleave
//! between an availability check and the claim it guards, and the unique
//! slot indexes remain as a backstop that surfaces as a slot conflict.

use chrono::Utc;
use pawdesk_core::PawdeskError;
use pawdesk_core::schedule::{boarding_markers, grooming_markers};
use pawdesk_core::types::{ReservationDetail, ReservationId, TransitionAction};

use crate::database::{Database, abort, is_unique_violation, map_tr_err};
use crate::models::{CouponOutcome, CreatedReservation, NewReservation, TransitionOutcome};
use crate::queries::{coupons, directory, orders, pricing, reservations, slots};

/// ID generation attempts before giving up. The 4-digit suffix makes a
/// same-second collision survive regeneration almost always on the first
/// retry.
const ID_ATTEMPTS: usize = 4;

/// Create a reservation: allocate an ID, insert the pending row, claim
/// every slot marker, and attach the coupon where requested. Commits all
/// of it or none of it.
pub async fn create(
    db: &Database,
    new: NewReservation,
) -> Result<CreatedReservation, PawdeskError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let kind = new.detail.kind();
            let now = Utc::now().naive_utc();
            let mut rng = rand::thread_rng();
            let mut id = ReservationId::generate(kind, now, &mut rng);
            let mut attempts = 1;
            while reservations::id_exists(&tx, &id)? {
                if attempts >= ID_ATTEMPTS {
                    return Err(abort(PawdeskError::Internal(
                        "could not allocate a unique reservation id".into(),
                    )));
                }
                id = ReservationId::generate(kind, now, &mut rng);
                attempts += 1;
            }

            reservations::insert_tx(&tx, &id, &new)?;

            match &new.detail {
                ReservationDetail::Grooming {
                    reservation_time,
                    grooming_period,
                    ..
                } => {
                    let markers = grooming_markers(*reservation_time, *grooming_period);
                    if let Some(marker) =
                        slots::claim_grooming(&tx, &id, &new.snapshot.store_name, &markers)?
                    {
                        return Err(abort(PawdeskError::slot_conflict(format!(
                            "grooming slot {} at {} is already booked",
                            marker.format("%Y-%m-%d %H:%M"),
                            new.snapshot.store_name,
                        ))));
                    }
                }
                ReservationDetail::Boarding {
                    room_type,
                    checkin_at,
                    checkout_at,
                } => {
                    let room = pricing::find_room_type_tx(
                        &tx,
                        &new.snapshot.store_name,
                        room_type,
                    )?
                    .ok_or_else(|| {
                        abort(PawdeskError::not_found(
                            "room type",
                            format!("{room_type} at {}", new.snapshot.store_name),
                        ))
                    })?;
                    let markers = boarding_markers(*checkin_at, *checkout_at);
                    if let Some(marker) = slots::claim_boarding(
                        &tx,
                        &id,
                        &new.snapshot.store_name,
                        room_type,
                        &markers,
                        room.room_count,
                    )? {
                        return Err(abort(PawdeskError::slot_conflict(format!(
                            "all {} {room_type} rooms at {} are taken at {}",
                            room.room_count,
                            new.snapshot.store_name,
                            marker.format("%Y-%m-%d %H:%M"),
                        ))));
                    }
                }
            }

            let coupon = match &new.coupon_user {
                Some(user_id) => coupons::attach(&tx, user_id, &id, &new.snapshot.store_name)?,
                None => CouponOutcome::NotRequested,
            };

            let reservation = reservations::fetch_tx(&tx, &id)?.ok_or_else(|| {
                abort(PawdeskError::Internal(
                    "reservation row missing before commit".into(),
                ))
            })?;
            tx.commit()?;

            tracing::info!(
                reservation_id = %reservation.reservation_id,
                kind = %kind,
                store = %reservation.snapshot.store_name,
                "reservation created"
            );
            Ok(CreatedReservation { reservation, coupon })
        })
        .await
        .map_err(map_create_err)
}

/// A unique-index hit on the slot tables means another writer claimed the
/// window between our check and insert, which the single-writer model
/// makes unreachable. Surface it the same way as the ordinary conflict.
fn map_create_err(e: tokio_rusqlite::Error) -> PawdeskError {
    match &e {
        tokio_rusqlite::Error::Rusqlite(re) if is_unique_violation(re) => {
            PawdeskError::slot_conflict("a concurrent booking claimed the slot first")
        }
        _ => map_tr_err(e),
    }
}

/// Apply a lifecycle action to a reservation.
///
/// The row is fetched by ID alone so a missing reservation reports
/// not-found and an existing one in the wrong state reports exactly which
/// state blocked the action. Completion resolves the snapshot identity
/// back to a customer account, writes the order, and consumes the attached
/// coupon; cancellation releases every slot marker the reservation held.
pub async fn transition(
    db: &Database,
    id: &ReservationId,
    action: TransitionAction,
    store_note: Option<String>,
) -> Result<TransitionOutcome, PawdeskError> {
    let id = id.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let current = reservations::fetch_tx(&tx, &id)?.ok_or_else(|| {
                abort(PawdeskError::not_found(
                    "reservation",
                    format!("{} (cannot {action})", id.as_str()),
                ))
            })?;

            let Some(next) = current.status.next(action) else {
                return Err(abort(PawdeskError::InvalidTransition {
                    reservation_id: id.as_str().to_string(),
                    current: current.status,
                    attempted: action,
                }));
            };

            let mut order_id = None;
            match action {
                TransitionAction::Confirm => {
                    reservations::set_status_tx(&tx, &id, next)?;
                    if let Some(note) = &store_note {
                        reservations::set_store_note_tx(&tx, &id, note)?;
                    }
                }
                TransitionAction::Cancel => {
                    reservations::set_status_tx(&tx, &id, next)?;
                    slots::delete_for_reservation_tx(&tx, &id)?;
                }
                TransitionAction::Complete => {
                    let matches = directory::identity_matches(
                        &tx,
                        &current.snapshot.user_name,
                        &current.snapshot.user_phone,
                    )?;
                    let customer = match matches.as_slice() {
                        [] => {
                            return Err(abort(PawdeskError::not_found(
                                "customer",
                                format!(
                                    "{} / {}",
                                    current.snapshot.user_name, current.snapshot.user_phone
                                ),
                            )));
                        }
                        [one] => one.clone(),
                        _ => {
                            return Err(abort(PawdeskError::ambiguous(
                                "customer",
                                format!(
                                    "{} / {}",
                                    current.snapshot.user_name, current.snapshot.user_phone
                                ),
                            )));
                        }
                    };

                    let oid = orders::insert_tx(&tx, &id, &customer.user_id, current.total_price)?;
                    reservations::set_status_tx(&tx, &id, next)?;
                    coupons::finalize(&tx, &id, oid)?;
                    order_id = Some(oid);
                }
            }

            tx.commit()?;

            tracing::info!(
                reservation_id = %id,
                from = %current.status,
                to = %next,
                "reservation transitioned"
            );
            Ok(TransitionOutcome {
                reservation_id: id,
                old_status: current.status,
                new_status: next,
                order_id,
            })
        })
        .await
        .map_err(map_tr_err)
}
