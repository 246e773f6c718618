// =-=-= sort/deep.rs =-=-=
// Deep sorting of groups that share a known prefix: small groups go to the
// blind trie, large ones through a ternary quicksort that carries the
// minimum LCP of each partition into its sub-ranges.

use super::Sorter;

impl<'p> Sorter<'p> {
    pub(crate) fn deep_sort(&mut self, lo: usize, n: usize, depth: i32) {
        self.stats.deep_sorts += 1;
        debug_assert!(n > 1);

        let blind_limit = self.n / self.params.blind_sort_ratio;
        if n as i32 <= blind_limit {
            self.blind_sort(lo, n, depth);
        } else {
            self.lcp_quicksort(lo, n, depth, blind_limit);
        }
    }

    // Full-suffix comparison: the byte difference at the first mismatch, or
    // the position difference once either suffix runs out of text (the
    // shorter suffix orders first). Also reports the number of equal bytes.
    pub(crate) fn cmp_deep(&self, mut p1: i32, mut p2: i32) -> (i32, i32) {
        debug_assert_ne!(p1, p2);
        let mut matched = 0i32;
        while p1 < self.n && p2 < self.n {
            let c1 = self.text[p1 as usize];
            let c2 = self.text[p2 as usize];
            if c1 != c2 {
                return (c1 as i32 - c2 as i32, matched);
            }
            p1 += 1;
            p2 += 1;
            matched += 1;
        }
        (p2 - p1, matched)
    }

    // Seward-style ternary quicksort with LCP bookkeeping. Each partition
    // records the smallest LCP seen against the pivot and restarts the
    // sub-range at depth + lcp, so matched prefixes are never re-read.
    fn lcp_quicksort(&mut self, lo: usize, n: usize, depth0: i32, blind_limit: i32) {
        let mut stack: Vec<(i32, i32, i32)> = Vec::with_capacity(64);
        let mut seed: i32 = 0;
        stack.push((lo as i32, (lo + n - 1) as i32, depth0));

        while let Some((lo_r, hi, depth)) = stack.pop() {
            if hi - lo_r < blind_limit {
                if hi > lo_r {
                    self.blind_sort(lo_r as usize, (hi - lo_r + 1) as usize, depth);
                }
                continue;
            }

            /* random pivot; magic constants per Sedgewick ch. 35 */
            seed = (seed * 7621 + 1) % 32768;
            let med = match seed % 3 {
                0 => lo_r,
                1 => (lo_r + hi) >> 1,
                _ => hi,
            };
            self.sa.swap(med as usize, hi as usize);
            let pivot_text = self.sa[hi as usize] + depth;

            let mut i = lo_r - 1;
            let mut j = hi;
            let mut lcp_lo = i32::MAX;
            let mut lcp_hi = i32::MAX;
            loop {
                loop {
                    i += 1;
                    if i >= hi {
                        break;
                    }
                    let (r, matched) = self.cmp_deep(self.sa[i as usize] + depth, pivot_text);
                    if r > 0 {
                        if matched < lcp_hi {
                            lcp_hi = matched;
                        }
                        break;
                    }
                    if matched < lcp_lo {
                        lcp_lo = matched;
                    }
                }
                loop {
                    j -= 1;
                    if j <= lo_r {
                        break;
                    }
                    let (r, matched) = self.cmp_deep(self.sa[j as usize] + depth, pivot_text);
                    if r < 0 {
                        if matched < lcp_lo {
                            lcp_lo = matched;
                        }
                        break;
                    }
                    if matched < lcp_hi {
                        lcp_hi = matched;
                    }
                }
                if i >= j {
                    break;
                }
                self.sa.swap(i as usize, j as usize);
            }
            self.sa.swap(i as usize, hi as usize);

            debug_assert!(lcp_lo < i32::MAX || i == lo_r);
            debug_assert!(lcp_hi < i32::MAX || i == hi);

            /* smaller side goes on top of the stack */
            if i - lo_r < hi - i {
                if hi - i > 1 {
                    stack.push((i + 1, hi, depth + lcp_hi));
                }
                if i - lo_r > 1 {
                    stack.push((lo_r, i - 1, depth + lcp_lo));
                }
            } else {
                if i - lo_r > 1 {
                    stack.push((lo_r, i - 1, depth + lcp_lo));
                }
                if hi - i > 1 {
                    stack.push((i + 1, hi, depth + lcp_hi));
                }
            }
        }
    }
}
