use std::collections::{HashSet, VecDeque};

use app_logger::trace;
use app_registry::{ClassTable, ExtractorClass};

use crate::error::OrderError;

/// Order the concrete classes of `table` so that every base class comes
/// before all of its subclasses.
///
/// Helper base classes that are not concrete are pulled in right before the
/// first class that needs them. Classes marked `generate_last` are scheduled
/// after everything else, and nothing else may derive from them.
pub fn order_classes(table: &ClassTable) -> Result<Vec<&ExtractorClass>, OrderError> {
    let (deferred, regular): (Vec<_>, Vec<_>) = table.concrete().partition(|c| c.generate_last);

    let mut scheduler = Scheduler::new(table);
    scheduler.run(regular, false)?;
    scheduler.run(deferred, true)?;

    Ok(scheduler.ordered)
}

struct Scheduler<'a> {
    table: &'a ClassTable,
    ordered: Vec<&'a ExtractorClass>,
    done: HashSet<&'a str>,
}
impl<'a> Scheduler<'a> {
    fn new(table: &'a ClassTable) -> Self {
        Self {
            table,
            ordered: Vec::with_capacity(table.len()),
            done: HashSet::with_capacity(table.len()),
        }
    }

    /// Repeatedly take the first pending class whose bases are all ordered.
    /// A base that is neither ordered nor pending is looked up and queued at
    /// the front.
    fn run(
        &mut self,
        classes: Vec<&'a ExtractorClass>,
        allow_deferred: bool,
    ) -> Result<(), OrderError> {
        let mut queued = classes
            .iter()
            .map(|c| c.name.as_str())
            .collect::<HashSet<_>>();
        let mut pending = VecDeque::from(classes);

        'scan: while !pending.is_empty() {
            for i in 0..pending.len() {
                let class = pending[i];

                let missing = class
                    .class_bases()
                    .find(|b| !self.done.contains(b) && !queued.contains(b));
                if let Some(base) = missing {
                    let base = self.lookup(class, base, allow_deferred)?;
                    trace!(class = %class.name, base = %base.name, "Queueing base class");

                    queued.insert(base.name.as_str());
                    pending.push_front(base);
                    continue 'scan;
                }

                if class.class_bases().all(|b| self.done.contains(b)) {
                    self.done.insert(class.name.as_str());
                    self.ordered.push(class);
                    queued.remove(class.name.as_str());
                    pending.remove(i);
                    continue 'scan;
                }
            }

            return Err(OrderError::Cycle(self.find_cycle(&pending)));
        }

        Ok(())
    }

    fn lookup(
        &self,
        class: &ExtractorClass,
        base: &str,
        allow_deferred: bool,
    ) -> Result<&'a ExtractorClass, OrderError> {
        let found = self
            .table
            .get(base)
            .ok_or_else(|| OrderError::UnknownBase {
                class: class.name.clone(),
                base: base.to_string(),
            })?;

        if found.generate_last && !allow_deferred {
            return Err(OrderError::DependsOnDeferred {
                class: class.name.clone(),
                base: base.to_string(),
            });
        }

        Ok(found)
    }

    /// Every pending class has at least one pending base when no progress can
    /// be made, so following those bases must revisit a class.
    fn find_cycle(&self, pending: &VecDeque<&'a ExtractorClass>) -> Vec<String> {
        let mut path: Vec<&str> = vec![];
        let mut current = pending.front().copied();

        while let Some(class) = current {
            if let Some(pos) = path.iter().position(|x| *x == class.name) {
                let mut cycle = path[pos..]
                    .iter()
                    .map(|x| (*x).to_string())
                    .collect::<Vec<_>>();
                cycle.push(class.name.clone());
                return cycle;
            }

            path.push(&class.name);
            current = class
                .class_bases()
                .find(|b| !self.done.contains(b))
                .and_then(|b| pending.iter().find(|c| c.name == b).copied());
        }

        path.into_iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use app_registry::{BaseRef, RootBase};

    use super::*;

    fn ie(name: &str) -> ExtractorClass {
        ExtractorClass::new(name, "yt_dlp.extractor.test")
    }

    fn names<'a>(ordered: &[&'a ExtractorClass]) -> Vec<&'a str> {
        ordered.iter().map(|c| c.name.as_str()).collect()
    }

    fn table<I: IntoIterator<Item = ExtractorClass>>(classes: I) -> ClassTable {
        ClassTable::builder()
            .register_all(classes)
            .build()
            .expect("valid table")
    }

    #[test]
    fn keeps_registration_order_when_bases_are_roots() {
        let t = table([
            ie("BIE"),
            ie("AIE").with_bases([RootBase::Search]),
            ie("CIE"),
        ]);

        assert_eq!(names(&order_classes(&t).expect("ordered")), ["BIE", "AIE", "CIE"]);
    }

    #[test]
    fn subclass_registered_before_base_waits_for_it() {
        let t = table([
            ie("ChildIE").with_bases(["ParentIE"]),
            ie("OtherIE"),
            ie("ParentIE"),
        ]);

        assert_eq!(
            names(&order_classes(&t).expect("ordered")),
            ["OtherIE", "ParentIE", "ChildIE"]
        );
    }

    #[test]
    fn helper_bases_are_pulled_in_but_only_once() {
        let t = table([
            ie("YoutubeBaseInfoExtractor").helper(),
            ie("YoutubeTabBaseInfoExtractor")
                .with_bases(["YoutubeBaseInfoExtractor"])
                .helper(),
            ie("YoutubeIE").with_bases(["YoutubeBaseInfoExtractor"]),
            ie("YoutubeTabIE").with_bases(["YoutubeTabBaseInfoExtractor"]),
            ie("YoutubeSearchIE")
                .with_bases([
                    BaseRef::from(RootBase::Search),
                    BaseRef::from("YoutubeTabBaseInfoExtractor"),
                ]),
        ]);

        assert_eq!(
            names(&order_classes(&t).expect("ordered")),
            [
                "YoutubeBaseInfoExtractor",
                "YoutubeIE",
                "YoutubeTabBaseInfoExtractor",
                "YoutubeTabIE",
                "YoutubeSearchIE",
            ]
        );
    }

    #[test]
    fn generate_last_goes_last() {
        let t = table([
            ie("GenericIE").last(),
            ie("AIE"),
            ie("BIE").with_bases(["AIE"]),
        ]);

        assert_eq!(
            names(&order_classes(&t).expect("ordered")),
            ["AIE", "BIE", "GenericIE"]
        );
    }

    #[test]
    fn deriving_from_generate_last_fails() {
        let t = table([ie("GenericIE").last(), ie("EmbedIE").with_bases(["GenericIE"])]);

        let err = order_classes(&t).unwrap_err();

        assert!(matches!(
            err,
            OrderError::DependsOnDeferred { class, base } if class == "EmbedIE" && base == "GenericIE"
        ));
    }

    #[test]
    fn unknown_base_fails() {
        let t = table([ie("AIE").with_bases(["MissingIE"])]);

        let err = order_classes(&t).unwrap_err();

        assert!(matches!(
            err,
            OrderError::UnknownBase { class, base } if class == "AIE" && base == "MissingIE"
        ));
    }

    #[test]
    fn cycles_are_reported_with_their_path() {
        let t = table([
            ie("OkIE"),
            ie("AIE").with_bases(["BIE"]),
            ie("BIE").with_bases(["CIE"]).helper(),
            ie("CIE").with_bases(["AIE"]),
        ]);

        let err = order_classes(&t).unwrap_err();

        match err {
            OrderError::Cycle(path) => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 4);
                for name in ["AIE", "BIE", "CIE"] {
                    assert!(path.iter().any(|x| x == name), "{name} missing from {path:?}");
                }
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let t = table([ie("AIE").with_bases(["AIE"])]);

        assert!(matches!(order_classes(&t), Err(OrderError::Cycle(path)) if path == ["AIE", "AIE"]));
    }

    #[test]
    fn bases_precede_subclasses_in_a_deep_graph() {
        let classes = (0..40)
            .rev()
            .map(|i| {
                let c = ie(&format!("C{i}IE"));
                match i {
                    0 => c,
                    i if i % 3 == 0 => c.with_bases([format!("C{}IE", i / 3), format!("C{}IE", i - 1)]),
                    i => c.with_bases([format!("C{}IE", i - 1)]),
                }
            })
            .collect::<Vec<_>>();
        let t = table(classes);

        let ordered = names(&order_classes(&t).expect("ordered"));

        assert_eq!(ordered.len(), 40);
        for c in t.classes() {
            let pos = ordered.iter().position(|x| *x == c.name).expect("emitted");
            for base in c.class_bases() {
                let base_pos = ordered.iter().position(|x| *x == base).expect("emitted");
                assert!(base_pos < pos, "{base} must precede {}", c.name);
            }
        }
    }
}
