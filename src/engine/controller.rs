//! User-facing operations on securities, attributes and the other sources.

use crate::chart::Chart;
use crate::domain::{Attribute, CdxIndex, ClientBenchmark, CustomBenchmark, MarketIndex, Security, SecurityId};
use crate::models::SeriesKey;

use super::core::ChartEngine;
use super::error::ChartError;
use super::messages::{ChartNotification, FetchReason, FetchStatus, FetchTarget};
use super::state::SecurityBinding;
use super::transformer::{to_basis, to_simple_ma};

impl<C: Chart> ChartEngine<C> {
    // --- SECURITIES & ATTRIBUTES ---

    /// Start tracking a security and plot its default attribute.
    /// A security that is already on the chart is ignored.
    pub fn add_security(&mut self, security: Security) -> Result<FetchStatus, ChartError> {
        if self.state.is_active(&security.id) {
            return Ok(FetchStatus::Ignored);
        }
        log::info!("Adding security {} ({})", security.id, security.label);

        let id = security.id.clone();
        self.state.bindings.push(SecurityBinding::new(security));
        let default = self.state.default_attribute.clone();
        self.add_attr(default, &id)
    }

    /// Plot another attribute of a tracked security.
    ///
    /// An identical attribute, or one whose fetch is already in flight, is
    /// ignored. A different attribute with a known tag replaces the stored one
    /// and refreshes its series in place.
    pub fn add_attr(
        &mut self,
        attribute: Attribute,
        security_id: &SecurityId,
    ) -> Result<FetchStatus, ChartError> {
        let Some(binding) = self.state.binding(security_id) else {
            return Err(ChartError::UnknownSecurity(security_id.clone()));
        };
        if binding.attributes.contains(&attribute) {
            return Ok(FetchStatus::Ignored);
        }
        let key = SeriesKey::security(security_id, &attribute.tag);
        if self.is_pending(&key) {
            return Ok(FetchStatus::Ignored);
        }

        let reason = if binding.attribute(&attribute.tag).is_some() {
            FetchReason::Refresh
        } else {
            FetchReason::Add
        };
        let target = FetchTarget::Attribute {
            security: binding.security.clone(),
            attribute,
        };
        self.submit(target, reason)
    }

    /// Stop plotting one attribute. The security goes too if that was its last series.
    pub fn remove_attr(&mut self, attr_tag: &str, security_id: &SecurityId) {
        let key = SeriesKey::security(security_id, attr_tag);
        if let Some(binding) = self.state.binding_mut(security_id) {
            binding.attributes.retain(|a| a.tag != attr_tag);
        }
        self.cancel_pending(&key);
        match self.chart.remove_series(&key) {
            Some(removed) => self.after_series_remove(&removed),
            // Nothing was plotted yet: the fetch we just cancelled was all it had
            None => self.drop_idle_binding(security_id),
        }
    }

    /// Forget a security left with no attributes, no series and no fetch in flight.
    /// One that never made it onto the chart goes silently.
    fn drop_idle_binding(&mut self, security_id: &SecurityId) {
        let Some(binding) = self.state.binding(security_id) else {
            return;
        };
        if !binding.attributes.is_empty() || self.is_security_pending(security_id) {
            return;
        }
        let plotted = binding.plotted;
        let has_series = self
            .chart
            .list_series()
            .iter()
            .any(|s| s.security_id.as_ref() == Some(security_id));
        if has_series {
            return;
        }
        if plotted {
            self.remove_security(security_id);
        } else {
            self.state.take_binding(security_id);
        }
    }

    /// Drop a security and every series tied to it. Unknown ids are ignored.
    pub fn remove_security(&mut self, security_id: &SecurityId) {
        if self.state.take_binding(security_id).is_none() {
            return;
        }
        log::info!("Removing security {}", security_id);
        self.cancel_pending_for_security(security_id);

        // Snapshot first: removal mutates the chart
        let ids: Vec<SeriesKey> = self
            .chart
            .list_series()
            .iter()
            .filter(|s| s.security_id.as_ref() == Some(security_id))
            .map(|s| s.id.clone())
            .collect();
        for id in ids {
            if let Some(removed) = self.chart.remove_series(&id) {
                self.cascade_axis(removed.y_axis);
            }
        }

        self.notify(ChartNotification::SecurityRemoved(security_id.clone()));
    }

    /// Switch the attribute every security shows by default.
    ///
    /// The old default's series are replaced on every security (without the
    /// security cascade in between), and the primary axis is retyped.
    pub fn change_default_attribute(&mut self, attribute: Attribute) {
        if self.state.default_attribute == attribute {
            return;
        }
        let old = std::mem::replace(&mut self.state.default_attribute, attribute.clone());
        log::info!("Default attribute {} -> {}", old.tag, attribute.tag);

        // 1. Take the old default off every security
        let security_ids: Vec<SecurityId> = self
            .state
            .bindings
            .iter()
            .map(|b| b.security.id.clone())
            .collect();
        let mut vacated = Vec::new();
        for id in &security_ids {
            let key = SeriesKey::security(id, &old.tag);
            if let Some(binding) = self.state.binding_mut(id) {
                binding.attributes.retain(|a| a.tag != old.tag);
            }
            self.cancel_pending(&key);
            if let Some(removed) = self.chart.remove_series(&key) {
                vacated.push(removed.y_axis);
            }
        }

        // 2. Retype the primary axis
        if let Some(primary) = self.state.primary_axis {
            self.chart.set_axis_title(primary, &attribute.label);
            self.chart
                .set_axis_type(primary, Some(attribute.axis_type().to_string()));
        }

        // 3. Plot the new default
        for id in &security_ids {
            if let Err(e) = self.add_attr(attribute.clone(), id) {
                log::warn!("Default attribute {} for {}: {}", attribute.tag, id, e);
                self.state.last_error = Some(e);
            }
        }

        // 4. Axes the old default no longer holds up
        for axis in vacated {
            self.cascade_axis(axis);
        }

        self.notify(ChartNotification::DefaultAttributeChanged(attribute));
    }

    // --- OTHER SOURCES ---

    pub fn add_market_indicator(&mut self, index: MarketIndex) -> Result<FetchStatus, ChartError> {
        self.add_tracked_source(FetchTarget::MarketIndex(index))
    }

    pub fn add_custom_benchmark(
        &mut self,
        benchmark: CustomBenchmark,
    ) -> Result<FetchStatus, ChartError> {
        self.check_benchmark(benchmark.validate())?;
        self.add_tracked_source(FetchTarget::CustomBenchmark(benchmark))
    }

    pub fn add_client_benchmark(
        &mut self,
        benchmark: ClientBenchmark,
    ) -> Result<FetchStatus, ChartError> {
        self.check_benchmark(benchmark.validate())?;
        self.add_tracked_source(FetchTarget::ClientBenchmark(benchmark))
    }

    pub fn add_cdx_index(&mut self, index: CdxIndex) -> Result<FetchStatus, ChartError> {
        self.check_benchmark(index.validate())?;
        self.add_tracked_source(FetchTarget::CdxIndex(index))
    }

    fn check_benchmark(&mut self, validation: Result<(), Vec<String>>) -> Result<(), ChartError> {
        match validation {
            Ok(()) => {
                self.state.alerts.benchmark_messages.clear();
                Ok(())
            }
            Err(messages) => {
                self.state.alerts.benchmark_messages = messages.clone();
                Err(ChartError::ValidationFailure(messages))
            }
        }
    }

    fn add_tracked_source(&mut self, target: FetchTarget) -> Result<FetchStatus, ChartError> {
        let key = target.key();
        if self.is_pending(&key) {
            return Ok(FetchStatus::Ignored);
        }
        let reason = if self.chart.get_series(&key).is_some() {
            FetchReason::Refresh
        } else {
            FetchReason::Add
        };
        self.submit(target, reason)
    }

    // --- DERIVED CURVES ---

    /// Plot a trailing `window`-day moving average of an existing series.
    pub fn add_simple_ma(&mut self, id: &SeriesKey, window: usize) -> Result<FetchStatus, ChartError> {
        if window == 0 {
            return Err(ChartError::InvalidWindow(window));
        }
        let source = self
            .chart
            .get_series(id)
            .ok_or_else(|| ChartError::UnknownSeries(id.to_string()))?;
        if source.disable_further_transformation {
            return Err(ChartError::TransformationDisabled(id.to_string()));
        }
        let sma = to_simple_ma(source, window).ok_or(ChartError::InvalidWindow(window))?;
        self.upsert(sma)
    }

    /// Plot `id - other`, matched by calendar day.
    pub fn add_basis(&mut self, id: &SeriesKey, other: &SeriesKey) -> Result<FetchStatus, ChartError> {
        let source = self
            .chart
            .get_series(id)
            .ok_or_else(|| ChartError::UnknownSeries(id.to_string()))?;
        let other = self
            .chart
            .get_series(other)
            .ok_or_else(|| ChartError::UnknownSeries(other.to_string()))?;
        let basis = to_basis(source, other);
        self.upsert(basis)
    }

    pub fn set_title(&mut self, title: &str) {
        self.chart.set_title(title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{default_attribute, engine, scripted_engine, series_key};

    fn volume() -> Attribute {
        Attribute::new("volume", "Volume").with_unit("Shares")
    }

    #[test]
    fn adding_a_security_twice_is_idempotent() {
        let (mut engine, script) = scripted_engine();
        let t = Security::new("1", "T");

        assert_eq!(engine.add_security(t.clone()), Ok(FetchStatus::Applied));
        assert_eq!(engine.add_security(t), Ok(FetchStatus::Ignored));

        assert_eq!(engine.state().bindings.len(), 1);
        assert_eq!(engine.chart().list_series().len(), 1);
        assert_eq!(script.labels(), vec!["attr:1:price"]);
    }

    #[test]
    fn identical_attribute_is_ignored() {
        let (mut engine, script) = scripted_engine();
        let sid = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();

        assert_eq!(engine.add_attr(default_attribute(), &sid), Ok(FetchStatus::Ignored));
        assert_eq!(script.labels().len(), 1);
    }

    #[test]
    fn same_tag_with_new_contents_replaces_and_refreshes() {
        let (mut engine, script) = scripted_engine();
        let sid = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();

        let mut annotated = default_attribute();
        annotated.metadata.insert("source".into(), "close".into());
        assert_eq!(engine.add_attr(annotated.clone(), &sid), Ok(FetchStatus::Applied));

        assert_eq!(script.labels(), vec!["attr:1:price", "attr:1:price"]);
        assert_eq!(engine.chart().list_series().len(), 1);
        let binding = engine.state().binding(&sid).unwrap();
        assert_eq!(binding.attributes, vec![annotated]);
    }

    #[test]
    fn attribute_for_unknown_security_is_an_error() {
        let mut engine = engine();
        let sid = SecurityId::from("404");
        assert_eq!(
            engine.add_attr(volume(), &sid),
            Err(ChartError::UnknownSecurity(sid))
        );
    }

    #[test]
    fn removing_last_attribute_removes_the_security_once() {
        let mut engine = engine();
        let sid = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.add_attr(volume(), &sid).unwrap();
        assert_eq!(engine.chart().list_axes().len(), 2);

        engine.remove_attr("volume", &sid);
        assert!(engine.state().is_active(&sid));
        assert_eq!(engine.chart().list_axes().len(), 1);
        assert!(engine.drain_notifications().is_empty());

        engine.remove_attr("price", &sid);
        assert!(!engine.state().is_active(&sid));
        assert!(engine.chart().list_axes().is_empty());
        assert_eq!(
            engine.drain_notifications(),
            vec![ChartNotification::SecurityRemoved(sid)]
        );
    }

    #[test]
    fn removing_the_only_pending_attribute_forgets_the_security() {
        let (mut engine, script) = scripted_engine();
        let sid = SecurityId::from("1");
        script.lock().hold = true;

        assert_eq!(engine.add_security(Security::new("1", "T")), Ok(FetchStatus::Pending));
        engine.remove_attr("price", &sid);

        assert!(!engine.state().is_active(&sid));
        assert!(engine.state().bindings.is_empty());
        assert!(!engine.is_processing());
        assert!(engine.drain_notifications().is_empty());

        // The security can be added again
        assert_eq!(engine.add_security(Security::new("1", "T")), Ok(FetchStatus::Pending));
        script.release_all();
        engine.update();
        assert_eq!(engine.chart().list_series().len(), 1);
        assert!(engine.state().binding(&sid).unwrap().plotted);
    }

    #[test]
    fn removing_a_pending_attribute_keeps_a_plotted_security() {
        let (mut engine, script) = scripted_engine();
        let sid = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();
        script.lock().hold = true;

        assert_eq!(engine.add_attr(volume(), &sid), Ok(FetchStatus::Pending));
        engine.remove_attr("volume", &sid);

        assert!(engine.state().is_active(&sid));
        assert_eq!(engine.chart().list_series().len(), 1);
        assert!(engine.drain_notifications().is_empty());
    }

    #[test]
    fn huge_sma_window_is_accepted() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();

        engine.add_simple_ma(&series_key("1", "price"), usize::MAX).unwrap();

        assert_eq!(engine.chart().list_series().len(), 2);
    }

    #[test]
    fn removing_a_security_takes_all_its_series() {
        let mut engine = engine();
        let t = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.add_security(Security::new("2", "VZ")).unwrap();
        engine.add_attr(volume(), &t).unwrap();
        engine.add_simple_ma(&series_key("1", "price"), 2).unwrap();
        assert_eq!(engine.chart().list_series().len(), 4);

        engine.remove_security(&t);
        engine.remove_security(&t);

        let left: Vec<SeriesKey> = engine
            .chart()
            .list_series()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(left, vec![series_key("2", "price")]);
        // The volume axis emptied out.
        assert_eq!(engine.chart().list_axes().len(), 1);
        assert_eq!(
            engine.drain_notifications(),
            vec![ChartNotification::SecurityRemoved(t)]
        );
    }

    #[test]
    fn incomplete_benchmark_is_refused_with_message() {
        let (mut engine, script) = scripted_engine();
        let benchmark = CustomBenchmark {
            sector: Some("Financials".into()),
            ..Default::default()
        };

        assert_eq!(
            engine.add_custom_benchmark(benchmark),
            Err(ChartError::ValidationFailure(vec!["Some fields are missing!".into()]))
        );
        assert_eq!(
            engine.alerts().benchmark_messages,
            vec!["Some fields are missing!".to_string()]
        );
        assert!(script.labels().is_empty());
    }

    #[test]
    fn host_side_validation_errors_surface_as_alerts() {
        let (mut engine, script) = scripted_engine();
        let cdx = CdxIndex {
            index: Some("CDX.NA.HY".into()),
            tenor: Some("5Y".into()),
            analytic: Some(Attribute::new("spread", "Spread").with_unit("bp")),
        };
        script.lock().invalid.insert("cdx:CDX.NA.HY".into());

        let result = engine.add_cdx_index(cdx.clone());
        assert!(matches!(result, Err(ChartError::ValidationFailure(_))));
        assert_eq!(engine.alerts().benchmark_messages.len(), 1);
        assert!(engine.state().cdx_indices.is_empty());

        script.lock().invalid.clear();
        assert_eq!(engine.add_cdx_index(cdx), Ok(FetchStatus::Applied));
        assert!(engine.alerts().benchmark_messages.is_empty());
        assert_eq!(engine.state().cdx_indices.len(), 1);
        let series = &engine.chart().list_series()[0];
        assert_eq!(series.id.to_string(), "CdxIndex.CDX.NA.HY.5Y.spread");
        assert_eq!(series.axis_type.as_deref(), Some("bp"));
    }

    #[test]
    fn client_benchmark_is_tracked_once() {
        let mut engine = engine();
        let benchmark = ClientBenchmark {
            id: Some("bm-1".into()),
            label: "House IG".into(),
            analytic: Some(Attribute::new("oas", "OAS").with_unit("bp")),
        };
        engine.add_client_benchmark(benchmark.clone()).unwrap();
        engine.add_client_benchmark(benchmark).unwrap();

        assert_eq!(engine.state().client_benchmarks.len(), 1);
        assert_eq!(engine.chart().list_series().len(), 1);
        assert_eq!(engine.chart().list_series()[0].name, "House IG OAS");
    }

    #[test]
    fn default_attribute_change_swaps_series_and_retypes_primary_axis() {
        let mut engine = engine();
        let t = SecurityId::from("1");
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.add_security(Security::new("2", "VZ")).unwrap();
        let primary = engine.state().primary_axis.unwrap();

        let ret = Attribute::new("return", "Return").with_unit("%");
        engine.change_default_attribute(ret.clone());

        let ids: Vec<String> = engine
            .chart()
            .list_series()
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["Security.1.return", "Security.2.return"]);
        let axis = engine.chart().get_axis(primary).unwrap();
        assert_eq!(axis.title, "Return");
        assert_eq!(axis.axis_type.as_deref(), Some("%"));
        assert!(engine.chart().series_on_axis(primary).len() == 2);
        assert_eq!(engine.state().binding(&t).unwrap().attributes, vec![ret.clone()]);

        // Securities survived the swap; only the change is announced.
        assert_eq!(
            engine.drain_notifications(),
            vec![ChartNotification::DefaultAttributeChanged(ret)]
        );
    }

    #[test]
    fn moving_average_rules() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        let price = series_key("1", "price");

        assert_eq!(engine.add_simple_ma(&price, 0), Err(ChartError::InvalidWindow(0)));
        assert!(matches!(
            engine.add_simple_ma(&series_key("9", "price"), 3),
            Err(ChartError::UnknownSeries(_))
        ));

        engine.add_simple_ma(&price, 3).unwrap();
        let sma_id = SeriesKey::SimpleMovingAverage {
            source: Box::new(price.clone()),
            window: 3,
        };
        let sma = engine.chart().get_series(&sma_id).unwrap();
        assert_eq!(sma.values(), vec![1.0, 1.5, 2.0, 3.0]);
        assert_eq!(sma.y_axis, engine.chart().get_series(&price).unwrap().y_axis);

        assert!(matches!(
            engine.add_simple_ma(&sma_id, 2),
            Err(ChartError::TransformationDisabled(_))
        ));
    }

    #[test]
    fn basis_of_two_securities() {
        let mut engine = engine();
        engine.add_security(Security::new("1", "T")).unwrap();
        engine.add_security(Security::new("2", "VZ")).unwrap();

        engine
            .add_basis(&series_key("1", "price"), &series_key("2", "price"))
            .unwrap();

        let basis = engine.chart().list_series().last().unwrap();
        assert_eq!(basis.name, "Basis of T Price - VZ Price");
        assert_eq!(basis.values(), vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(basis.security_id, Some(SecurityId::from("1")));
    }

    #[test]
    fn title_goes_to_the_chart() {
        let mut engine = engine();
        engine.set_title("Telecoms");
        assert_eq!(engine.chart().title(), "Telecoms");
    }
}
